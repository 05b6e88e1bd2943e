use std::collections::HashMap;

use serde::Serialize;

use super::{
    index::ElementIndex,
    render::{Markup, RenderMode, Stylesheet},
};
use crate::domain::{LabelKind, NodeId};

/// The label given to one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelAssignment {
    /// The labelled element: a heading, list item, figure or table.
    pub node: NodeId,
    /// The element's ID, if it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    /// What kind of label this is.
    pub kind: LabelKind,
    /// The nesting depth whose template component produced the label.
    pub depth: usize,
    /// The full label text. Empty when the element is unlabelled.
    pub display: String,
    /// The label without the component's own prefix and suffix, as
    /// inherited by descendants.
    pub bare: String,
    /// How the label is materialized.
    pub mode: RenderMode,
}

impl LabelAssignment {
    /// Whether the element ended up without a label.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }
}

/// The outcome of labelling one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Labelling {
    assignments: Vec<LabelAssignment>,
    #[serde(skip)]
    by_node: HashMap<NodeId, usize>,
    #[serde(skip)]
    index: ElementIndex,
    markup: Markup,
    stylesheet: Stylesheet,
}

impl Labelling {
    pub(crate) fn new(
        assignments: Vec<LabelAssignment>,
        index: ElementIndex,
        markup: Markup,
        stylesheet: Stylesheet,
    ) -> Self {
        let by_node = assignments
            .iter()
            .enumerate()
            .map(|(i, assignment)| (assignment.node, i))
            .collect();
        Self {
            assignments,
            by_node,
            index,
            markup,
            stylesheet,
        }
    }

    /// Every assignment, in document order.
    #[must_use]
    pub fn assignments(&self) -> &[LabelAssignment] {
        &self.assignments
    }

    pub(crate) fn assignment(&self, index: usize) -> Option<&LabelAssignment> {
        self.assignments.get(index)
    }

    /// The assignment for element `node`, if it is labelable.
    #[must_use]
    pub fn label_of(&self, node: NodeId) -> Option<&LabelAssignment> {
        self.by_node
            .get(&node)
            .and_then(|&i| self.assignments.get(i))
    }

    /// The display label of element `node`, or `""`.
    #[must_use]
    pub fn display(&self, node: NodeId) -> &str {
        self.label_of(node).map_or("", |a| a.display.as_str())
    }

    /// The element-ID index built during the pass.
    #[must_use]
    pub const fn index(&self) -> &ElementIndex {
        &self.index
    }

    /// Classes and inline styles the output needs.
    #[must_use]
    pub const fn markup(&self) -> &Markup {
        &self.markup
    }

    /// Rules for lists rendered by stylesheet counters.
    #[must_use]
    pub const fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }
}
