use std::fmt::Write as _;

use clap::Parser;
use numbering::{Template, TemplateSyntaxError, domain::TemplateComponent};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Parse label templates and show their components")]
pub struct Check {
    /// Templates to check
    #[arg(required = true, value_name = "TEMPLATE")]
    templates: Vec<String>,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let mut failures = 0;
        for source in &self.templates {
            match Template::parse(source) {
                Ok(template) => print!("{}", describe(&template)),
                Err(error) => {
                    failures += 1;
                    print!("{}", describe_error(source, &error));
                }
            }
        }
        if failures > 0 {
            anyhow::bail!("{failures} of {} templates are invalid", self.templates.len());
        }
        Ok(())
    }
}

fn describe(template: &Template) -> String {
    let mut out = format!("{} {:?}\n", "ok".success(), template.source());
    if template.is_empty() {
        out.push_str("  (no components: labels are empty)\n");
    }
    for (depth, part) in template.parts().iter().enumerate() {
        let _ = writeln!(out, "  {depth}: {}", component(part));
    }
    if template.repeats() {
        out.push_str("  *: last component repeats at deeper levels\n");
    }
    out
}

fn component(part: &TemplateComponent) -> String {
    let mut fields = Vec::new();
    if !part.prefix().is_empty() {
        fields.push(format!("prefix={:?}", part.prefix()));
    }
    if let Some(parent) = part.parent() {
        fields.push(format!("parent={parent}"));
        if part.style().is_some() {
            fields.push(format!("separator={:?}", part.separator()));
        }
    }
    match part.style() {
        Some(style) => fields.push(format!("style={style}")),
        None => fields.push("no counter".to_string()),
    }
    if !part.suffix().is_empty() {
        fields.push(format!("suffix={:?}", part.suffix()));
    }
    fields.join(" ")
}

fn describe_error(source: &str, error: &TemplateSyntaxError) -> String {
    let position = match error {
        TemplateSyntaxError::UnknownStyle { position, .. }
        | TemplateSyntaxError::UnterminatedQuote { position, .. }
        | TemplateSyntaxError::MisplacedRepeat { position, .. }
        | TemplateSyntaxError::UnexpectedToken { position, .. } => *position,
    };
    format!(
        "{} {error}\n  {source}\n  {}^\n",
        "error".warning(),
        " ".repeat(position)
    )
}
