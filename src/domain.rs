//! Domain models for document labelling.
//!
//! This module contains the value types the labelling passes work with:
//! counter styles, label templates, the element tree, and configuration.

/// Counter styles and their text generation.
pub mod counter_style;
pub use counter_style::{CounterStyle, UnsupportedStyleError};

mod config;
pub use config::{ConfigError, LabelConfig};

/// The input element tree.
pub mod document;
pub use document::{Directives, Document, Element, ElementKind, HeadingLevel, LabelKind, NodeId};

pub mod template;
pub use template::{ParentIndicator, Template, TemplateCache, TemplateComponent, TemplateSyntaxError};
