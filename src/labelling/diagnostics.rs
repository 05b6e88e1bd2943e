//! Recoverable problems found while labelling.
//!
//! None of these stop a document from being labelled. They are handed to a
//! [`Diagnostics`] sink supplied by the caller.

use crate::domain::{NodeId, TemplateSyntaxError};

/// A labelling problem that was worked around.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// A template failed to parse; the elements it would have labelled get
    /// no label.
    #[error("label template rejected{}: {error}", node.map(|n| format!(" at element {n}")).unwrap_or_default())]
    TemplateRejected {
        /// The element whose directive held the template, or `None` for a
        /// configured default.
        node: Option<NodeId>,
        /// The parse failure.
        error: TemplateSyntaxError,
    },

    /// An element ID occurs more than once; references use the first.
    #[error("duplicate element id '{0}'")]
    DuplicateId(String),

    /// A cross-reference placeholder could not be resolved and was removed.
    #[error("unresolved cross-reference in link to '{href}'")]
    UnresolvedReference {
        /// The link target.
        href: String,
    },

    /// A braced cross-reference qualifier is not `X`, `L`, `H` or `H1`-`H6`.
    #[error("invalid cross-reference qualifier '{qualifier}' in link to '{href}'")]
    InvalidQualifier {
        /// The link target.
        href: String,
        /// The qualifier text.
        qualifier: String,
    },
}

/// Receives warnings from the labelling passes.
pub trait Diagnostics {
    /// Reports a warning.
    fn warn(&mut self, warning: Warning);
}

/// Collects warnings in order.
impl Diagnostics for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Emits warnings as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
    }
}
