//! Label allocation and cross-reference resolution.
//!
//! A [`LabelEngine`] walks a [`Document`] once, assigning a label to every
//! heading, list item, figure and table, and then rewrites cross-reference
//! placeholders in link text using the labels it assigned.

mod allocator;
mod assignment;
pub mod diagnostics;
mod index;
pub mod render;
mod resolver;
mod scope;

use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use tracing::instrument;

pub use assignment::{LabelAssignment, Labelling};
pub use diagnostics::{Diagnostics, TracingDiagnostics, Warning};
pub use index::{Anchor, ChainLink, ElementIndex};
pub use render::{Markup, RenderMode, RenderStrategy, Stylesheet};
pub use resolver::CrossReferenceResolver;

use crate::domain::{Document, LabelConfig, TemplateCache};

/// Labels documents according to a [`LabelConfig`].
///
/// Parsed templates are cached across documents; counters and the element
/// index start afresh for each one.
#[derive(Debug)]
pub struct LabelEngine {
    config: LabelConfig,
    templates: TemplateCache,
    strategy: RenderStrategy,
}

impl LabelEngine {
    /// Creates an engine for `config`.
    #[must_use]
    pub fn new(config: LabelConfig) -> Self {
        let strategy = RenderStrategy::from_config(&config);
        Self {
            config,
            templates: TemplateCache::new(),
            strategy,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Assigns labels to every labelable element of `document`.
    #[instrument(level = "debug", skip_all, fields(elements = document.len()))]
    pub fn label<D: Diagnostics>(&mut self, document: &Document, diagnostics: &mut D) -> Labelling {
        let labelling = allocator::Allocator::new(
            &self.config,
            &mut self.templates,
            self.strategy,
            diagnostics,
        )
        .run(document);
        tracing::debug!(
            labels = labelling.assignments().len(),
            ids = labelling.index().len(),
            "labelled document"
        );
        labelling
    }

    /// Labels `document`, then resolves the cross-references in its links.
    pub fn process<D: Diagnostics>(
        &mut self,
        document: &mut Document,
        diagnostics: &mut D,
    ) -> Labelling {
        let labelling = self.label(document, diagnostics);
        CrossReferenceResolver::new(&labelling).resolve_document(document, diagnostics);
        labelling
    }
}

/// Labels and resolves many independent documents in parallel.
///
/// Warnings are emitted through `tracing`. The result holds one
/// [`Labelling`] per document, in the same order.
#[instrument(level = "debug", skip_all, fields(documents = documents.len()))]
pub fn label_documents(documents: &mut [Document], config: &LabelConfig) -> Vec<Labelling> {
    documents
        .par_iter_mut()
        .map(|document| LabelEngine::new(config.clone()).process(document, &mut TracingDiagnostics))
        .collect()
}
