//! Counters and the stack of open labelled scopes.
//!
//! Counters live in an arena keyed by label kind and owning node, so a
//! counter restarts whenever a new owner (list, parent heading, enclosing
//! figure) opens. Records of open scopes point back into the assignment
//! list by index.

use std::{collections::HashMap, sync::Arc};

use crate::domain::{LabelKind, NodeId, ParentIndicator, Template, TemplateComponent};

/// A template together with the depth whose component is in effect.
#[derive(Debug, Clone)]
pub struct ActiveTemplate {
    template: Arc<Template>,
    depth: usize,
}

impl ActiveTemplate {
    /// The template at depth `depth`, if the template reaches that deep.
    pub fn at(template: Arc<Template>, depth: usize) -> Option<Self> {
        template
            .component(depth)
            .is_some()
            .then_some(Self { template, depth })
    }

    /// The same template one level deeper.
    pub fn descend(&self) -> Option<Self> {
        Self::at(Arc::clone(&self.template), self.depth + 1)
    }

    pub fn component(&self) -> Option<&TemplateComponent> {
        self.template.component(self.depth)
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    fn same_as(&self, other: &Self) -> bool {
        self.depth == other.depth && self.template.source() == other.template.source()
    }
}

/// Identifies a counter: the kind it numbers and the node that owns it.
///
/// Document-wide counters (top-level headings, figures outside any other
/// figure) have no owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub kind: LabelKind,
    pub owner: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Counter {
    pub active: ActiveTemplate,
    pub count: u64,
}

#[derive(Debug, Default)]
pub struct Counters {
    counters: HashMap<CounterKey, Counter>,
}

impl Counters {
    pub fn get(&self, key: &CounterKey) -> Option<&Counter> {
        self.counters.get(key)
    }

    pub fn get_mut(&mut self, key: &CounterKey) -> Option<&mut Counter> {
        self.counters.get_mut(key)
    }

    /// The template currently driving the counter at `key`.
    pub fn active(&self, key: &CounterKey) -> Option<ActiveTemplate> {
        self.counters.get(key).map(|counter| counter.active.clone())
    }

    /// Puts `active` in charge of the counter at `key`.
    ///
    /// An identical template keeps counting; any other template starts a
    /// fresh count. Returns `true` when a fresh count was started.
    pub fn bind(&mut self, key: CounterKey, active: ActiveTemplate) -> bool {
        if self
            .counters
            .get(&key)
            .is_some_and(|counter| counter.active.same_as(&active))
        {
            return false;
        }
        self.counters.insert(key, Counter { active, count: 0 });
        true
    }
}

/// An open labelled scope.
#[derive(Debug, Clone)]
pub struct ScopeRecord {
    pub node: NodeId,
    pub kind: LabelKind,
    pub active: Option<ActiveTemplate>,
    /// The latest assignment made in this scope: the element's own label
    /// for headings, figures and tables, the current item for lists.
    pub assignment: Option<usize>,
}

impl ScopeRecord {
    pub fn is_numbered(&self) -> bool {
        self.active
            .as_ref()
            .and_then(ActiveTemplate::component)
            .is_some_and(TemplateComponent::is_numbered)
    }
}

/// One entry of an ancestor chain captured for an element ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// The kind of labelled scope.
    pub kind: LabelKind,
    /// Whether the scope's template carries a number.
    pub numbered: bool,
    /// Index of the scope's current assignment.
    pub assignment: Option<usize>,
}

/// The open scopes at the current point of the walk.
///
/// Headings are kept apart because their sections end at the next heading
/// of the same or a shallower level, not at the end of a subtree.
#[derive(Debug, Default)]
pub struct Scopes {
    nested: Vec<ScopeRecord>,
    headings: Vec<ScopeRecord>,
}

impl Scopes {
    /// Opens a subtree scope and returns its position, to be handed back to
    /// [`Scopes::close`].
    pub fn open(&mut self, record: ScopeRecord) -> usize {
        self.nested.push(record);
        self.nested.len() - 1
    }

    /// Closes the scope at `position` along with everything opened after it.
    pub fn close(&mut self, position: usize) {
        self.nested.truncate(position);
    }

    pub fn nested_mut(&mut self, position: usize) -> Option<&mut ScopeRecord> {
        self.nested.get_mut(position)
    }

    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    /// Ends the sections of headings at `level` or deeper.
    pub fn close_headings(&mut self, level: crate::domain::HeadingLevel) {
        while self
            .headings
            .last()
            .and_then(|record| record.kind.heading_level())
            .is_some_and(|open| open >= level)
        {
            self.headings.pop();
        }
    }

    pub fn open_heading(&mut self, record: ScopeRecord) {
        self.headings.push(record);
    }

    pub fn innermost_heading(&self) -> Option<&ScopeRecord> {
        self.headings.last()
    }

    /// The innermost open scope of `kind` among the first `limit` subtree
    /// scopes.
    pub fn nearest(&self, kind: LabelKind, limit: usize) -> Option<&ScopeRecord> {
        self.nested[..limit.min(self.nested.len())]
            .iter()
            .rev()
            .find(|record| record.kind == kind)
    }

    /// How many open subtree scopes below `limit` are of `kind`.
    pub fn count(&self, kind: LabelKind, limit: usize) -> usize {
        self.nested[..limit.min(self.nested.len())]
            .iter()
            .filter(|record| record.kind == kind)
            .count()
    }

    /// The nearest numbered scope satisfying `indicator`, looking only at
    /// the first `limit` subtree scopes and all open headings.
    pub fn parent(&self, indicator: ParentIndicator, limit: usize) -> Option<&ScopeRecord> {
        let wanted = |record: &&ScopeRecord| record.is_numbered() && indicator.matches(record.kind);
        let nested = self.nested[..limit.min(self.nested.len())]
            .iter()
            .rev()
            .find(wanted);
        let heading = self.headings.iter().rev().find(wanted);
        match (nested, heading) {
            (Some(a), Some(b)) => Some(if a.node > b.node { a } else { b }),
            (a, b) => a.or(b),
        }
    }

    /// Every open scope, outermost first.
    pub fn chain(&self) -> Vec<ChainLink> {
        let mut records: Vec<&ScopeRecord> =
            self.headings.iter().chain(self.nested.iter()).collect();
        records.sort_by_key(|record| record.node);
        records
            .into_iter()
            .map(|record| ChainLink {
                kind: record.kind,
                numbered: record.is_numbered(),
                assignment: record.assignment,
            })
            .collect()
    }
}
