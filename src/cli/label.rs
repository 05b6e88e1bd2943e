use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use numbering::{Document, ElementKind, LabelConfig, Labelling, label_documents};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Label JSON element trees and resolve cross-references")]
pub struct Label {
    /// JSON documents to label
    #[arg(required = true, value_name = "DOC.json")]
    documents: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Write the generated list stylesheet to this file
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Label {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &LabelConfig) -> anyhow::Result<()> {
        let mut documents = self
            .documents
            .iter()
            .map(|path| read_document(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let labellings = label_documents(&mut documents, config);

        match self.format {
            OutputFormat::Text => self.output_text(&mut documents, &labellings),
            OutputFormat::Json => self.output_json(&documents, &labellings)?,
        }

        if let Some(path) = &self.css {
            let css = self.stylesheet(&labellings);
            std::fs::write(path, css)
                .with_context(|| format!("failed to write stylesheet to {}", path.display()))?;
        }

        Ok(())
    }

    fn output_text(&self, documents: &mut [Document], labellings: &[Labelling]) {
        let several = documents.len() > 1;
        for ((path, document), labelling) in self.documents.iter().zip(documents).zip(labellings) {
            if several {
                println!("{}", path.display().to_string().info());
            }
            for assignment in labelling.assignments().iter().filter(|a| !a.is_empty()) {
                println!(
                    "  {:>6}  {:<7} {}",
                    assignment.node.to_string().dim(),
                    assignment.kind.to_string(),
                    assignment.display.trim()
                );
            }

            let links = links(document);
            if !links.is_empty() {
                println!("  {}", "links".dim());
                for (href, text) in links {
                    println!("  {href:>14}  {text}");
                }
            }
        }
    }

    fn output_json(&self, documents: &[Document], labellings: &[Labelling]) -> anyhow::Result<()> {
        let output: Vec<_> = self
            .documents
            .iter()
            .zip(documents)
            .zip(labellings)
            .map(|((path, document), labelling)| {
                serde_json::json!({
                    "path": path,
                    "document": document,
                    "labels": labelling,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&output).context("failed to render json output")?;
        println!("{json}");
        Ok(())
    }

    fn stylesheet(&self, labellings: &[Labelling]) -> String {
        let mut css = String::new();
        for (path, labelling) in self.documents.iter().zip(labellings) {
            if labelling.stylesheet().is_empty() {
                continue;
            }
            if self.documents.len() > 1 {
                let _ = writeln!(css, "/* {} */", path.display());
            }
            css.push_str(&labelling.stylesheet().to_css());
        }
        css
    }
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse document {}", path.display()))
}

/// The target and text of every link, in document order.
fn links(document: &mut Document) -> Vec<(String, String)> {
    let mut links = Vec::new();
    document.for_each_mut(|_, element| {
        if let ElementKind::Link { href, text } = &element.kind {
            links.push((href.clone(), text.clone()));
        }
    });
    links
}
