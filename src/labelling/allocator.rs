//! The label allocator: one pre-order walk that numbers every labelable
//! element.

use std::{collections::HashSet, sync::Arc};

use tracing::trace;

use super::{
    assignment::{LabelAssignment, Labelling},
    diagnostics::{Diagnostics, Warning},
    index::{Anchor, ElementIndex},
    render::{LABELLED_CLASS, Markup, NO_LABEL_CLASS, RenderMode, RenderStrategy, Stylesheet},
    scope::{ActiveTemplate, CounterKey, Counters, ScopeRecord, Scopes},
};
use crate::domain::{
    Document, Element, ElementKind, HeadingLevel, LabelConfig, LabelKind, NodeId, ParentIndicator,
    Template, TemplateCache,
};

/// The outcome of reading an element's `label` directive.
enum Directive {
    Absent,
    Template(Arc<Template>),
    Rejected,
}

pub struct Allocator<'a, D> {
    config: &'a LabelConfig,
    templates: &'a mut TemplateCache,
    strategy: RenderStrategy,
    diagnostics: &'a mut D,
    counters: Counters,
    scopes: Scopes,
    assignments: Vec<LabelAssignment>,
    index: ElementIndex,
    markup: Markup,
    stylesheet: Stylesheet,
    /// Configured templates already reported as invalid.
    rejected: HashSet<&'a str>,
    next_node: usize,
}

impl<'a, D: Diagnostics> Allocator<'a, D> {
    pub fn new(
        config: &'a LabelConfig,
        templates: &'a mut TemplateCache,
        strategy: RenderStrategy,
        diagnostics: &'a mut D,
    ) -> Self {
        Self {
            config,
            templates,
            strategy,
            diagnostics,
            counters: Counters::default(),
            scopes: Scopes::default(),
            assignments: Vec::new(),
            index: ElementIndex::default(),
            markup: Markup::default(),
            stylesheet: Stylesheet::default(),
            rejected: HashSet::new(),
            next_node: 0,
        }
    }

    pub fn run(mut self, document: &Document) -> Labelling {
        for element in &document.elements {
            self.visit(element);
        }
        Labelling::new(self.assignments, self.index, self.markup, self.stylesheet)
    }

    const fn allocate_node(&mut self) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        node
    }

    fn visit(&mut self, element: &Element) {
        let node = self.allocate_node();
        match &element.kind {
            ElementKind::Heading { level } => self.heading(node, *level, element),
            ElementKind::OrderedList => self.list(node, LabelKind::OrderedList, element),
            ElementKind::UnorderedList => self.list(node, LabelKind::UnorderedList, element),
            ElementKind::Figure => self.sequence(node, LabelKind::Figure, element),
            ElementKind::Table => self.sequence(node, LabelKind::Table, element),
            ElementKind::ListItem | ElementKind::Link { .. } | ElementKind::Other => {
                self.anchor(node, element);
                self.visit_children(element);
            }
        }
    }

    fn visit_children(&mut self, element: &Element) {
        for child in &element.children {
            self.visit(child);
        }
    }

    /// Headings count among siblings under the nearest shallower heading,
    /// and stay open until a heading at the same or a shallower level.
    ///
    /// A template only passes down to the level directly below, so a
    /// heading that skips a level gets no inherited label.
    fn heading(&mut self, node: NodeId, level: HeadingLevel, element: &Element) {
        let kind = LabelKind::Heading { level };
        self.scopes.close_headings(level);

        let owner = self.scopes.innermost_heading();
        let key = CounterKey {
            kind,
            owner: owner.map(|record| record.node),
        };
        let inherited = owner
            .filter(|record| {
                record
                    .kind
                    .heading_level()
                    .is_some_and(|open| open.get() + 1 == level.get())
            })
            .and_then(|record| record.active.as_ref())
            .and_then(ActiveTemplate::descend);
        if inherited.is_none() && owner.is_some() {
            trace!(%node, %kind, "no heading template one level up");
        }

        let active = self.select(node, element, key, inherited, 0);
        let assignment = self.label(
            node,
            kind,
            element,
            active.is_some().then_some(key),
            self.scopes.depth(),
        );
        self.scopes.open_heading(ScopeRecord {
            node,
            kind,
            active,
            assignment: Some(assignment),
        });
        self.anchor(node, element);
        self.visit_children(element);
    }

    /// Figures and tables count document-wide, or within the nearest
    /// enclosing element of the same kind.
    fn sequence(&mut self, node: NodeId, kind: LabelKind, element: &Element) {
        let limit = self.scopes.depth();
        let enclosing = self.scopes.nearest(kind, limit);
        let key = CounterKey {
            kind,
            owner: enclosing.map(|record| record.node),
        };
        let inherited = enclosing
            .and_then(|record| record.active.as_ref())
            .and_then(ActiveTemplate::descend);
        let depth = self.scopes.count(kind, limit);

        let active = self.select(node, element, key, inherited, depth);
        let assignment = self.label(node, kind, element, active.is_some().then_some(key), limit);
        let position = self.scopes.open(ScopeRecord {
            node,
            kind,
            active,
            assignment: Some(assignment),
        });
        self.anchor(node, element);
        self.visit_children(element);
        self.scopes.close(position);
    }

    /// Each list owns the counter of its items. Items may switch the
    /// template part-way through.
    fn list(&mut self, node: NodeId, kind: LabelKind, element: &Element) {
        self.anchor(node, element);

        let limit = self.scopes.depth();
        let key = CounterKey {
            kind,
            owner: Some(node),
        };
        let inherited = self
            .scopes
            .nearest(kind, limit)
            .and_then(|record| record.active.as_ref())
            .and_then(ActiveTemplate::descend);
        let depth = self.scopes.count(kind, limit);

        let active = self.select(node, element, key, inherited, depth);
        let labelled = active.is_some();
        let position = self.scopes.open(ScopeRecord {
            node,
            kind,
            active,
            assignment: None,
        });

        let stylesheet = self.strategy.mode_for(kind) == RenderMode::Stylesheet;
        let mut list_class = None;
        if labelled {
            self.markup.add_class(node, LABELLED_CLASS);
            if stylesheet {
                list_class = self.list_rules(node, key, position);
            }
        }

        let mut item_class: Option<String> = None;
        for child in &element.children {
            if child.kind != ElementKind::ListItem {
                self.visit(child);
                continue;
            }
            let item = self.allocate_node();

            let mut counter = self.counters.get(&key).is_some().then_some(key);
            let mut rejected = false;
            match self.directive(item, child) {
                Directive::Absent => {}
                Directive::Rejected => {
                    counter = None;
                    rejected = true;
                }
                Directive::Template(template) => {
                    if let Some(active) = ActiveTemplate::at(template, 0) {
                        if let Some(record) = self.scopes.nested_mut(position) {
                            record.active = Some(active.clone());
                        }
                        if self.counters.bind(key, active) {
                            self.markup.add_class(node, LABELLED_CLASS);
                            if stylesheet {
                                item_class =
                                    Some(self.switch_rules(node, &mut list_class, item, key, position));
                            }
                        }
                        counter = Some(key);
                    }
                }
            }

            let assignment = self.label(item, kind, child, counter, position);
            if let Some(record) = self.scopes.nested_mut(position) {
                record.assignment = Some(assignment);
            }
            if child.directives.no_label || (rejected && stylesheet) {
                self.markup.add_class(item, NO_LABEL_CLASS);
            }
            if let Some(class) = &item_class {
                self.markup.add_class(item, class);
            }

            self.anchor(item, child);
            self.visit_children(child);
        }

        self.scopes.close(position);
    }

    /// Picks the template for an element and binds it to the counter at
    /// `key`.
    ///
    /// An explicit directive wins. Without one, the counter keeps its
    /// current template, else the enclosing scope's template continues one
    /// level deeper, else the configured default applies at `depth`.
    fn select(
        &mut self,
        node: NodeId,
        element: &Element,
        key: CounterKey,
        inherited: Option<ActiveTemplate>,
        depth: usize,
    ) -> Option<ActiveTemplate> {
        let active = match self.directive(node, element) {
            Directive::Template(template) => ActiveTemplate::at(template, 0),
            Directive::Rejected => None,
            Directive::Absent => self
                .counters
                .active(&key)
                .or(inherited)
                .or_else(|| self.configured(key.kind, depth)),
        }?;
        self.counters.bind(key, active.clone());
        Some(active)
    }

    fn directive(&mut self, node: NodeId, element: &Element) -> Directive {
        let Some(source) = element.directives.label.as_deref() else {
            return Directive::Absent;
        };
        match self.templates.parse(source) {
            Ok(template) => Directive::Template(template),
            Err(error) => {
                self.diagnostics.warn(Warning::TemplateRejected {
                    node: Some(node),
                    error,
                });
                Directive::Rejected
            }
        }
    }

    fn configured(&mut self, kind: LabelKind, depth: usize) -> Option<ActiveTemplate> {
        let config = self.config;
        let source = config.template_for(kind)?;
        match self.templates.parse(source) {
            Ok(template) => {
                let active = ActiveTemplate::at(template, depth);
                if active.is_none() {
                    trace!(%kind, depth, "configured template does not reach this depth");
                }
                active
            }
            Err(error) => {
                if self.rejected.insert(source) {
                    self.diagnostics
                        .warn(Warning::TemplateRejected { node: None, error });
                }
                None
            }
        }
    }

    /// Records the label of `node`, counted by the counter at `counter`.
    ///
    /// Ancestor labels are looked up among the first `parent_limit` subtree
    /// scopes, which lets list items skip their own list.
    fn label(
        &mut self,
        node: NodeId,
        kind: LabelKind,
        element: &Element,
        counter: Option<CounterKey>,
        parent_limit: usize,
    ) -> usize {
        let mut assignment = LabelAssignment {
            node,
            element_id: element.id.clone(),
            kind,
            depth: 0,
            display: String::new(),
            bare: String::new(),
            mode: self.strategy.mode_for(kind),
        };

        if let Some(counter) = counter.and_then(|key| self.counters.get_mut(&key)) {
            let active = counter.active.clone();
            assignment.depth = active.depth();
            if element.directives.no_label {
                trace!(%node, %kind, "label suppressed");
            } else if let Some(component) = active.component() {
                if component.style().is_some() {
                    counter.count += 1;
                }
                let count = counter.count;
                let parent = component
                    .parent()
                    .and_then(|indicator| self.parent_label(indicator, parent_limit));
                let composed = component.compose(count, parent.as_deref());
                assignment.display = composed.display;
                assignment.bare = composed.bare;
            }
        }

        trace!(%node, %kind, label = %assignment.display, "assigned label");
        self.assignments.push(assignment);
        self.assignments.len() - 1
    }

    fn parent_label(&self, indicator: ParentIndicator, limit: usize) -> Option<String> {
        let Some(record) = self.scopes.parent(indicator, limit) else {
            trace!(%indicator, "no enclosing label");
            return None;
        };
        record
            .assignment
            .and_then(|index| self.assignments.get(index))
            .map(|assignment| assignment.bare.clone())
    }

    fn anchor(&mut self, node: NodeId, element: &Element) {
        let Some(id) = element.id.as_deref() else {
            return;
        };
        let anchor = Anchor {
            node,
            chain: self.scopes.chain(),
        };
        if !self.index.insert(id, anchor) {
            self.diagnostics.warn(Warning::DuplicateId(id.to_string()));
        }
    }

    /// Stylesheet rules for a list counted from the start.
    fn list_rules(&mut self, node: NodeId, key: CounterKey, position: usize) -> Option<String> {
        let active = self.counters.active(&key)?;
        let component = active.component()?;
        let parent = component
            .parent()
            .and_then(|indicator| self.parent_label(indicator, position));

        let class = self.stylesheet.allocate_class();
        self.stylesheet.list(&class, component, parent.as_deref());
        self.markup.add_class(node, &class);
        Some(class)
    }

    /// Stylesheet rules for the items of a list from `item` onwards, after
    /// a template switch. Returns the class those items carry.
    fn switch_rules(
        &mut self,
        node: NodeId,
        list_class: &mut Option<String>,
        item: NodeId,
        key: CounterKey,
        position: usize,
    ) -> String {
        let list_class = list_class
            .get_or_insert_with(|| {
                let class = self.stylesheet.allocate_class();
                self.markup.add_class(node, &class);
                class
            })
            .clone();

        let class = self.stylesheet.allocate_class();
        let active = self.counters.active(&key);
        if let Some(component) = active.as_ref().and_then(ActiveTemplate::component) {
            let parent = component
                .parent()
                .and_then(|indicator| self.parent_label(indicator, position));
            self.stylesheet
                .switch(&list_class, &class, component, parent.as_deref());
            if component.style().is_some() {
                self.markup
                    .add_style(item, format!("counter-reset:{class}"));
            }
        }
        class
    }
}
