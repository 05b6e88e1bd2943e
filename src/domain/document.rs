//! The element tree consumed by the labelling passes.
//!
//! A [`Document`] is an ordered forest of [`Element`]s, already parsed from
//! whatever markup the surrounding pipeline handles. Directive extraction
//! has also happened upstream: each element carries a small
//! [`Directives`] record instead of raw attributes.

use std::{fmt, num::NonZeroU8};

use serde::{Deserialize, Serialize};

/// A heading level, 1 to 6 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(NonZeroU8);

/// Error returned for a heading level outside 1..=6.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("invalid heading level {0}: must be between 1 and 6")]
pub struct HeadingLevelError(pub u8);

impl HeadingLevel {
    /// Top-level headings.
    pub const H1: Self = Self(NonZeroU8::MIN);

    /// Creates a heading level.
    ///
    /// # Errors
    ///
    /// Returns [`HeadingLevelError`] unless `level` is between 1 and 6.
    pub const fn new(level: u8) -> Result<Self, HeadingLevelError> {
        match NonZeroU8::new(level) {
            Some(nz) if level <= 6 => Ok(Self(nz)),
            _ => Err(HeadingLevelError(level)),
        }
    }

    /// The numeric level.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = HeadingLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.get()
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// The kinds of element that can carry a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LabelKind {
    /// A heading at the given level.
    Heading {
        /// The heading level.
        level: HeadingLevel,
    },
    /// An item of an ordered list.
    OrderedList,
    /// An item of an unordered list.
    UnorderedList,
    /// A figure.
    Figure,
    /// A table.
    Table,
}

impl LabelKind {
    /// Whether labels of this kind belong to list items.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::OrderedList | Self::UnorderedList)
    }

    /// The heading level, for heading labels.
    #[must_use]
    pub const fn heading_level(self) -> Option<HeadingLevel> {
        match self {
            Self::Heading { level } => Some(level),
            _ => None,
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Heading { level } => write!(f, "{level}"),
            Self::OrderedList => f.write_str("ol"),
            Self::UnorderedList => f.write_str("ul"),
            Self::Figure => f.write_str("figure"),
            Self::Table => f.write_str("table"),
        }
    }
}

/// What an element is, as far as labelling is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElementKind {
    /// A heading. Headings open an implicit section that lasts until the
    /// next heading of the same or a shallower level.
    Heading {
        /// The heading level.
        level: HeadingLevel,
    },
    /// An ordered list; its [`ElementKind::ListItem`] children are labelled.
    OrderedList,
    /// An unordered list; its [`ElementKind::ListItem`] children are
    /// labelled.
    UnorderedList,
    /// An item of the enclosing list.
    ListItem,
    /// A figure.
    Figure,
    /// A table.
    Table,
    /// A hyperlink whose text may contain cross-reference placeholders.
    Link {
        /// The link target, `#id` for references within the document.
        href: String,
        /// The link text.
        text: String,
    },
    /// Anything else.
    Other,
}

/// Labelling directives attached to an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Directives {
    /// A label template overriding the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Suppresses the label of this element without consuming a number.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_label: bool,
}

impl Directives {
    /// Directives carrying a label template.
    #[must_use]
    pub fn label(template: impl Into<String>) -> Self {
        Self {
            label: Some(template.into()),
            no_label: false,
        }
    }

    /// Directives suppressing the label.
    #[must_use]
    pub const fn no_label() -> Self {
        Self {
            label: None,
            no_label: true,
        }
    }
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// The element kind.
    #[serde(flatten)]
    pub kind: ElementKind,

    /// The element ID, unique within the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Labelling directives.
    #[serde(default, skip_serializing_if = "is_default")]
    pub directives: Directives,

    /// Child elements, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

fn is_default(directives: &Directives) -> bool {
    directives == &Directives::default()
}

impl Element {
    /// Creates an element with no ID, directives or children.
    #[must_use]
    pub const fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            directives: Directives {
                label: None,
                no_label: false,
            },
            children: Vec::new(),
        }
    }

    /// A heading at `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if `level` is not between 1 and 6.
    pub fn try_heading(level: u8) -> Result<Self, HeadingLevelError> {
        let level = HeadingLevel::new(level)?;
        Ok(Self::new(ElementKind::Heading { level }))
    }

    /// A heading at `level`, for levels known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not between 1 and 6. Use
    /// [`try_heading`](Self::try_heading) for levels from input.
    #[must_use]
    pub fn heading(level: u8) -> Self {
        Self::try_heading(level).expect("heading level must be between 1 and 6")
    }

    /// An ordered list holding `items`.
    #[must_use]
    pub fn ordered_list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::new(ElementKind::OrderedList).with_children(items)
    }

    /// An unordered list holding `items`.
    #[must_use]
    pub fn unordered_list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::new(ElementKind::UnorderedList).with_children(items)
    }

    /// A list item.
    #[must_use]
    pub const fn item() -> Self {
        Self::new(ElementKind::ListItem)
    }

    /// A hyperlink.
    #[must_use]
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(ElementKind::Link {
            href: href.into(),
            text: text.into(),
        })
    }

    /// Sets the element ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the directives.
    #[must_use]
    pub fn with_directives(mut self, directives: Directives) -> Self {
        self.directives = directives;
        self
    }

    /// Appends children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Position of an element in a pre-order walk of its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parsed document: an ordered forest of elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level elements, in document order.
    pub elements: Vec<Element>,
}

impl Document {
    /// Creates a document from its top-level elements.
    #[must_use]
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// Visits every element mutably in document order, with its [`NodeId`].
    pub fn for_each_mut(&mut self, mut visit: impl FnMut(NodeId, &mut Element)) {
        fn walk(
            element: &mut Element,
            next: &mut usize,
            visit: &mut impl FnMut(NodeId, &mut Element),
        ) {
            let id = NodeId(*next);
            *next += 1;
            visit(id, element);
            for child in &mut element.children {
                walk(child, next, visit);
            }
        }

        let mut next = 0;
        for element in &mut self.elements {
            walk(element, &mut next, &mut visit);
        }
    }

    /// The number of elements in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        fn count(element: &Element) -> usize {
            1 + element.children.iter().map(count).sum::<usize>()
        }
        self.elements.iter().map(count).sum()
    }

    /// Whether the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_bounds() {
        assert!(HeadingLevel::new(0).is_err());
        assert_eq!(HeadingLevel::new(1), Ok(HeadingLevel::H1));
        assert_eq!(HeadingLevel::new(6).map(HeadingLevel::get), Ok(6));
        assert_eq!(HeadingLevel::new(7), Err(HeadingLevelError(7)));
    }

    #[test]
    fn heading_constructor_checks_level() {
        assert_eq!(Element::try_heading(2), Ok(Element::heading(2)));
        assert_eq!(Element::try_heading(0), Err(HeadingLevelError(0)));
        assert_eq!(Element::try_heading(9), Err(HeadingLevelError(9)));
    }

    #[test]
    fn node_ids_follow_pre_order() {
        let mut document = Document::new([
            Element::heading(1),
            Element::ordered_list([Element::item(), Element::item()]),
            Element::new(ElementKind::Other),
        ]);

        let mut seen = Vec::new();
        document.for_each_mut(|id, element| seen.push((id, element.kind.clone())));

        assert_eq!(document.len(), 5);
        assert_eq!(seen[1], (NodeId(1), ElementKind::OrderedList));
        assert_eq!(seen[3], (NodeId(3), ElementKind::ListItem));
        assert_eq!(seen[4], (NodeId(4), ElementKind::Other));
    }

    #[test]
    fn deserializes_from_json() {
        let json = r##"{
            "elements": [
                { "kind": "heading", "level": 2, "id": "intro", "directives": { "label": "1. " } },
                { "kind": "ordered-list", "children": [
                    { "kind": "list-item", "directives": { "no-label": true } }
                ]},
                { "kind": "link", "href": "#intro", "text": "see ##" }
            ]
        }"##;

        let document: Document = serde_json::from_str(json).unwrap();

        let heading = &document.elements[0];
        assert_eq!(
            heading.kind,
            ElementKind::Heading {
                level: HeadingLevel::new(2).unwrap()
            }
        );
        assert_eq!(heading.id.as_deref(), Some("intro"));
        assert_eq!(heading.directives, Directives::label("1. "));
        assert!(document.elements[1].children[0].directives.no_label);
        assert_eq!(
            document.elements[2].kind,
            ElementKind::Link {
                href: "#intro".to_string(),
                text: "see ##".to_string()
            }
        );
    }

    #[test]
    fn heading_level_out_of_range_is_rejected_when_deserializing() {
        let json = r#"{ "elements": [ { "kind": "heading", "level": 9 } ] }"#;
        assert!(serde_json::from_str::<Document>(json).is_err());
    }
}
