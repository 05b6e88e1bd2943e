//! Label templates.
//!
//! A template describes how to build a label at each nesting depth. It is
//! written as a comma-separated list of components, one per depth, with an
//! optional trailing `*` that repeats the last component indefinitely:
//!
//! ```text
//! template  := component ( ',' component )* [ ',' '*' ]
//! component := literal* [ [ ('X' | 'L' | 'H' [1-6]) literal+ ] style literal* ]
//! ```
//!
//! `style` is a counter-style name or shorthand (`1`, `a`, `A`, `i`, `I`).
//! `X`, `L` and `H` insert the bare label of the nearest numbered ancestor
//! (any, list, or heading) ahead of the element's own counter. Literals may
//! be quoted with `'` or `"`; a doubled quote inside stands for itself.
//!
//! ```
//! use numbering::domain::template::{ParentIndicator, Template};
//!
//! let template: Template = "(H.1),*".parse().unwrap();
//! let part = template.component(3).unwrap();
//!
//! assert_eq!(part.prefix(), "(");
//! assert_eq!(part.parent(), Some(ParentIndicator::HeadingLabel));
//! assert_eq!(part.separator(), ".");
//! assert_eq!(part.suffix(), ")");
//! ```

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

mod parser;

use crate::domain::{
    counter_style::CounterStyle,
    document::{HeadingLevel, LabelKind},
};

/// Which enclosing label a template component (or a cross-reference)
/// refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentIndicator {
    /// `X`: any numbered ancestor.
    AnyLabel,
    /// `L`: the nearest numbered list item.
    ListLabel,
    /// `H`: the nearest numbered heading.
    HeadingLabel,
    /// `H1` to `H6`: the nearest numbered heading at that level.
    HeadingLabelAtLevel(HeadingLevel),
}

impl ParentIndicator {
    /// Whether a label of `kind` satisfies this indicator.
    #[must_use]
    pub fn matches(self, kind: LabelKind) -> bool {
        match self {
            Self::AnyLabel => true,
            Self::ListLabel => kind.is_list(),
            Self::HeadingLabel => kind.heading_level().is_some(),
            Self::HeadingLabelAtLevel(level) => kind.heading_level() == Some(level),
        }
    }
}

impl FromStr for ParentIndicator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            b"X" => Ok(Self::AnyLabel),
            b"L" => Ok(Self::ListLabel),
            b"H" => Ok(Self::HeadingLabel),
            [b'H', digit @ b'1'..=b'6'] => HeadingLevel::new(digit - b'0')
                .map(Self::HeadingLabelAtLevel)
                .map_err(|_| ()),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ParentIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AnyLabel => f.write_str("X"),
            Self::ListLabel => f.write_str("L"),
            Self::HeadingLabel => f.write_str("H"),
            Self::HeadingLabelAtLevel(level) => write!(f, "H{}", level.get()),
        }
    }
}

/// The label format for one nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateComponent {
    prefix: String,
    parent: Option<ParentIndicator>,
    separator: String,
    style: Option<CounterStyle>,
    suffix: String,
}

/// A label built from a [`TemplateComponent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedLabel {
    /// The full label: prefix, core, suffix.
    pub display: String,
    /// The core label without the component's own prefix and suffix.
    pub bare: String,
}

impl TemplateComponent {
    /// Literal text placed before everything else.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The ancestor label inserted ahead of the counter, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<ParentIndicator> {
        self.parent
    }

    /// Literal text between the ancestor label and the counter.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The counter style. `None` means the label is literal only.
    #[must_use]
    pub const fn style(&self) -> Option<CounterStyle> {
        self.style
    }

    /// Literal text placed after everything else.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether labels built from this component carry a number of their
    /// own or inherited from an ancestor.
    #[must_use]
    pub const fn is_numbered(&self) -> bool {
        self.style.is_some() || self.parent.is_some()
    }

    /// Builds a label for counter value `count`.
    ///
    /// `parent` is the bare label of the ancestor selected by
    /// [`parent`](Self::parent). When it is absent or empty, neither it nor
    /// the separator appear.
    #[must_use]
    pub fn compose(&self, count: u64, parent: Option<&str>) -> ComposedLabel {
        let mut bare = String::new();
        if let Some(parent) = parent.filter(|p| !p.is_empty()) {
            bare.push_str(parent);
            if self.style.is_some() {
                bare.push_str(&self.separator);
            }
        }
        if let Some(style) = self.style {
            bare.push_str(&style.render(count));
        }
        let display = format!("{}{}{}", self.prefix, bare, self.suffix);
        ComposedLabel { display, bare }
    }
}

/// A compiled label template.
///
/// Templates are immutable once parsed. Two templates are the same
/// template when their source text is identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<TemplateComponent>,
    repeat_last: bool,
}

impl Template {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateSyntaxError`] for unknown counter styles,
    /// unterminated quotes, a misplaced `*`, or a component holding more
    /// than one counter.
    pub fn parse(source: &str) -> Result<Self, TemplateSyntaxError> {
        parser::parse(source)
    }

    /// The text this template was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The explicit components, outermost first.
    #[must_use]
    pub fn parts(&self) -> &[TemplateComponent] {
        &self.parts
    }

    /// Whether the last component applies to every deeper level.
    #[must_use]
    pub const fn repeats(&self) -> bool {
        self.repeat_last
    }

    /// Whether the template yields no labels at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The component governing nesting `depth`, or `None` if the template
    /// does not reach that deep.
    #[must_use]
    pub fn component(&self, depth: usize) -> Option<&TemplateComponent> {
        self.parts
            .get(depth)
            .or_else(|| self.parts.last().filter(|_| self.repeat_last))
    }
}

impl FromStr for Template {
    type Err = TemplateSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Errors raised while parsing a label template.
///
/// Positions are character offsets into the template text.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TemplateSyntaxError {
    /// A token in counter-style position is not a known style.
    #[error("unknown counter style '{name}' at position {position} in label template \"{template}\"")]
    UnknownStyle {
        /// The template text.
        template: String,
        /// The unrecognised name.
        name: String,
        /// Where the name starts.
        position: usize,
    },

    /// A quoted literal is not closed.
    #[error("unterminated quote at position {position} in label template \"{template}\"")]
    UnterminatedQuote {
        /// The template text.
        template: String,
        /// Where the opening quote is.
        position: usize,
    },

    /// `*` stands alone in a component other than the last (or the first).
    #[error("misplaced '*' at position {position} in label template \"{template}\": it may only form the final component")]
    MisplacedRepeat {
        /// The template text.
        template: String,
        /// Where the `*` is.
        position: usize,
    },

    /// A component contains a second counter style.
    #[error("unexpected '{token}' at position {position} in label template \"{template}\": a component holds at most one counter")]
    UnexpectedToken {
        /// The template text.
        template: String,
        /// The offending token.
        token: String,
        /// Where the token starts.
        position: usize,
    },
}

/// Parses templates, caching them by source text.
///
/// Parsing the same text twice yields the same shared [`Template`].
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<String, Arc<Template>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the template for `source`, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the [`TemplateSyntaxError`] from [`Template::parse`]. Failed
    /// parses are not cached.
    pub fn parse(&mut self, source: &str) -> Result<Arc<Template>, TemplateSyntaxError> {
        if let Some(template) = self.templates.get(source) {
            return Ok(Arc::clone(template));
        }
        let template = Arc::new(Template::parse(source)?);
        self.templates
            .insert(source.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// The number of distinct templates parsed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether nothing has been parsed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_selection_without_repeat() {
        let template = Template::parse("1. ,(a) ,(i) ").unwrap();

        assert_eq!(template.parts().len(), 3);
        assert!(!template.repeats());
        assert_eq!(template.component(1).unwrap().prefix(), "(");
        assert!(template.component(3).is_none());
    }

    #[test]
    fn depth_selection_with_repeat() {
        let template = Template::parse("H.1. ,*").unwrap();

        assert_eq!(template.parts().len(), 1);
        assert!(template.repeats());
        for depth in 0..6 {
            let part = template.component(depth).unwrap();
            assert_eq!(part.parent(), Some(ParentIndicator::HeadingLabel));
            assert_eq!(part.style(), Some(CounterStyle::Decimal));
        }
    }

    #[test]
    fn compose_with_and_without_parent() {
        let template = Template::parse("(L.a)").unwrap();
        let part = template.component(0).unwrap();

        let with_parent = part.compose(2, Some("3"));
        assert_eq!(with_parent.display, "(3.b)");
        assert_eq!(with_parent.bare, "3.b");

        let orphan = part.compose(2, None);
        assert_eq!(orphan.display, "(b)");
        assert_eq!(orphan.bare, "b");

        assert_eq!(part.compose(1, Some("")).display, "(a)");
    }

    #[test]
    fn compose_literal_only() {
        let template = Template::parse("• ").unwrap();
        let part = template.component(0).unwrap();

        assert!(!part.is_numbered());
        let label = part.compose(7, None);
        assert_eq!(label.display, "• ");
        assert_eq!(label.bare, "");
    }

    #[test]
    fn parent_indicator_matching() {
        let h2 = LabelKind::Heading {
            level: HeadingLevel::new(2).unwrap(),
        };
        let at_h2 = ParentIndicator::HeadingLabelAtLevel(HeadingLevel::new(2).unwrap());

        assert!(ParentIndicator::AnyLabel.matches(LabelKind::Figure));
        assert!(ParentIndicator::ListLabel.matches(LabelKind::UnorderedList));
        assert!(!ParentIndicator::ListLabel.matches(h2));
        assert!(ParentIndicator::HeadingLabel.matches(h2));
        assert!(at_h2.matches(h2));
        assert!(!at_h2.matches(LabelKind::Heading {
            level: HeadingLevel::H1
        }));
    }

    #[test]
    fn parent_indicator_from_str() {
        assert_eq!("X".parse(), Ok(ParentIndicator::AnyLabel));
        assert_eq!("L".parse(), Ok(ParentIndicator::ListLabel));
        assert_eq!("H".parse(), Ok(ParentIndicator::HeadingLabel));
        assert_eq!(
            "H4".parse(),
            Ok(ParentIndicator::HeadingLabelAtLevel(
                HeadingLevel::new(4).unwrap()
            ))
        );
        assert!("H7".parse::<ParentIndicator>().is_err());
        assert!("Q".parse::<ParentIndicator>().is_err());
    }

    #[test]
    fn cache_shares_templates() {
        let mut cache = TemplateCache::new();
        let first = cache.parse("1.").unwrap();
        let second = cache.parse("1.").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.parse("nonsense").is_err());
        assert_eq!(cache.len(), 1);
    }
}
