//! Template-driven document numbering
//!
//! Assigns labels such as `1.2`, `(b)` or `Figure 3:` to the headings, list
//! items, figures and tables of a parsed document, and resolves
//! cross-reference placeholders in link text to those labels.
//!
//! ```
//! use numbering::{Document, Element, LabelConfig, LabelEngine, Warning};
//!
//! let config = LabelConfig {
//!     heading_labels: Some("H.1 ,*".to_string()),
//!     ..LabelConfig::default()
//! };
//! let document = Document::new([Element::heading(1), Element::heading(2)]);
//!
//! let labelling = LabelEngine::new(config).label(&document, &mut Vec::<Warning>::new());
//! let labels: Vec<_> = labelling.assignments().iter().map(|a| a.display.as_str()).collect();
//! assert_eq!(labels, ["1 ", "1.1 "]);
//! ```

pub mod domain;
pub use domain::{
    CounterStyle, Directives, Document, Element, ElementKind, HeadingLevel, LabelConfig, LabelKind,
    NodeId, Template, TemplateSyntaxError,
};

pub mod labelling;
pub use labelling::{
    CrossReferenceResolver, Diagnostics, LabelAssignment, LabelEngine, Labelling,
    TracingDiagnostics, Warning, label_documents,
};
