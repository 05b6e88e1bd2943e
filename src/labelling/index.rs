use std::collections::HashMap;

use crate::domain::NodeId;

pub use super::scope::ChainLink;

/// Where an element ID points, and the labelled scopes around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The element carrying the ID.
    pub node: NodeId,
    /// The labelled scopes enclosing the element (or labelled by it),
    /// outermost first.
    pub chain: Vec<ChainLink>,
}

/// Maps element IDs to their [`Anchor`]s.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    anchors: HashMap<String, Anchor>,
}

impl ElementIndex {
    /// Records `anchor` under `id`. The first occurrence of an ID wins;
    /// returns `false` if `id` was already present.
    pub(crate) fn insert(&mut self, id: &str, anchor: Anchor) -> bool {
        if self.anchors.contains_key(id) {
            return false;
        }
        self.anchors.insert(id.to_string(), anchor);
        true
    }

    /// The anchor recorded for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    /// The number of indexed IDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether no IDs were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
