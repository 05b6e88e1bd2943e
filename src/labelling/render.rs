//! How labels reach the output: as text, or through stylesheet counters.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::domain::{LabelConfig, LabelKind, NodeId, TemplateComponent};

/// Class of a list whose items are labelled.
pub const LABELLED_CLASS: &str = "la-labelled";

/// Class of a list item whose label is suppressed.
pub const NO_LABEL_CLASS: &str = "la-no-label";

/// How a label is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// The label text is inserted into the element.
    Inline,
    /// The label is generated by stylesheet counters; the element only
    /// carries classes.
    Stylesheet,
}

/// Chooses a [`RenderMode`] per label kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStrategy {
    lists: RenderMode,
}

impl RenderStrategy {
    /// Every label inline.
    pub const INLINE: Self = Self {
        lists: RenderMode::Inline,
    };

    /// The strategy selected by `config`.
    #[must_use]
    pub const fn from_config(config: &LabelConfig) -> Self {
        Self {
            lists: if config.css_lists {
                RenderMode::Stylesheet
            } else {
                RenderMode::Inline
            },
        }
    }

    /// The mode for labels of `kind`. Only list labels can be rendered by
    /// the stylesheet.
    #[must_use]
    pub const fn mode_for(self, kind: LabelKind) -> RenderMode {
        if kind.is_list() {
            self.lists
        } else {
            RenderMode::Inline
        }
    }
}

impl Default for RenderStrategy {
    fn default() -> Self {
        Self::INLINE
    }
}

/// Classes and inline styles to add to elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Markup {
    classes: BTreeMap<NodeId, Vec<String>>,
    styles: BTreeMap<NodeId, Vec<String>>,
}

impl Markup {
    pub(crate) fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = self.classes.entry(node).or_default();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub(crate) fn add_style(&mut self, node: NodeId, declaration: String) {
        self.styles.entry(node).or_default().push(declaration);
    }

    /// Classes to add to `node`.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.classes.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Inline style declarations to add to `node`, without trailing `;`.
    #[must_use]
    pub fn styles(&self, node: NodeId) -> &[String] {
        self.styles.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Whether nothing needs to be added anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.styles.is_empty()
    }
}

/// Stylesheet rules generated for counter-rendered lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    rules: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
    #[serde(skip)]
    classes: usize,
}

impl Stylesheet {
    /// The rules, in generation order.
    #[must_use]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Whether no rules were generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The stylesheet text, one rule per line.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = self.rules.join("\n");
        if !css.is_empty() {
            css.push('\n');
        }
        css
    }

    fn rule(&mut self, rule: String) {
        if self.seen.insert(rule.clone()) {
            self.rules.push(rule);
        }
    }

    /// A fresh class name, doubling as the counter name.
    pub(crate) fn allocate_class(&mut self) -> String {
        self.classes += 1;
        format!("la-label{}", self.classes)
    }

    fn labelled(&mut self) {
        self.rule(format!(".{LABELLED_CLASS}>li{{list-style-type:none;}}"));
    }

    /// Rules for a list whose items are counted by `class`.
    pub(crate) fn list(&mut self, class: &str, component: &TemplateComponent, parent: Option<&str>) {
        self.labelled();
        if component.style().is_some() {
            self.rule(format!(".{class}{{counter-reset:{class};}}"));
            self.rule(format!(
                ".{class}>li:not(.{NO_LABEL_CLASS}){{counter-increment:{class};}}"
            ));
        }
        self.rule(format!(
            ".{class}>li:not(.{NO_LABEL_CLASS})::before{{content:{};}}",
            content(class, component, parent)
        ));
    }

    /// Rules for items of list `list_class` switched to a new template,
    /// counted by `class`.
    pub(crate) fn switch(
        &mut self,
        list_class: &str,
        class: &str,
        component: &TemplateComponent,
        parent: Option<&str>,
    ) {
        self.labelled();
        if component.style().is_some() {
            self.rule(format!(
                ".{list_class}>li.{class}:not(.{NO_LABEL_CLASS}){{counter-increment:{class};}}"
            ));
        }
        self.rule(format!(
            ".{list_class}>li.{class}:not(.{NO_LABEL_CLASS})::before{{content:{};}}",
            content(class, component, parent)
        ));
    }
}

/// The `content` value producing labels of `component` from counter
/// `counter`.
fn content(counter: &str, component: &TemplateComponent, parent: Option<&str>) -> String {
    fn literal(parts: &mut Vec<String>, text: &str) {
        if !text.is_empty() {
            parts.push(quote(text));
        }
    }

    let mut parts = Vec::new();
    literal(&mut parts, component.prefix());
    if let Some(parent) = parent.filter(|p| !p.is_empty()) {
        literal(&mut parts, parent);
        if component.style().is_some() {
            literal(&mut parts, component.separator());
        }
    }
    if let Some(style) = component.style() {
        parts.push(format!("counter({counter},{})", style.css_name()));
    }
    literal(&mut parts, component.suffix());

    if parts.is_empty() {
        "\"\"".to_string()
    } else {
        parts.join(" ")
    }
}

/// A CSS string literal.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\a "),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Template;

    fn component(source: &str) -> TemplateComponent {
        Template::parse(source).unwrap().parts()[0].clone()
    }

    #[test]
    fn strategy_follows_css_lists() {
        let config = LabelConfig {
            css_lists: true,
            ..LabelConfig::default()
        };
        let strategy = RenderStrategy::from_config(&config);

        assert_eq!(strategy.mode_for(LabelKind::OrderedList), RenderMode::Stylesheet);
        assert_eq!(strategy.mode_for(LabelKind::Figure), RenderMode::Inline);
        assert_eq!(
            RenderStrategy::default().mode_for(LabelKind::UnorderedList),
            RenderMode::Inline
        );
    }

    #[test]
    fn content_expression() {
        assert_eq!(
            content("la-label1", &component("1. "), None),
            r#"counter(la-label1,decimal) ". ""#
        );
        assert_eq!(
            content("la-label2", &component("(L.a)"), Some("1")),
            r#""(" "1" "." counter(la-label2,lower-alpha) ")""#
        );
        assert_eq!(
            content("la-label3", &component("(L.a)"), None),
            r#""(" counter(la-label3,lower-alpha) ")""#
        );
        assert_eq!(content("la-label4", &component("'\"'"), None), r#""\"""#);
        assert_eq!(content("la-label5", &TemplateComponent::default(), None), r#""""#);
    }

    #[test]
    fn list_rules() {
        let mut sheet = Stylesheet::default();
        let class = sheet.allocate_class();
        sheet.list(&class, &component("1."), None);

        assert_eq!(
            sheet.rules(),
            [
                ".la-labelled>li{list-style-type:none;}",
                ".la-label1{counter-reset:la-label1;}",
                ".la-label1>li:not(.la-no-label){counter-increment:la-label1;}",
                r#".la-label1>li:not(.la-no-label)::before{content:counter(la-label1,decimal) ".";}"#,
            ]
        );

        let switched = sheet.allocate_class();
        sheet.switch(&class, &switched, &component("a)"), None);
        assert_eq!(
            sheet.rules()[4],
            ".la-label1>li.la-label2:not(.la-no-label){counter-increment:la-label2;}"
        );

        let again = sheet.allocate_class();
        sheet.list(&again, &component("• "), None);
        assert_eq!(
            sheet.rules().last().map(String::as_str),
            Some(r#".la-label3>li:not(.la-no-label)::before{content:"• ";}"#)
        );
        assert_eq!(
            sheet.rules().iter().filter(|r| r.contains("list-style-type")).count(),
            1
        );
    }

    #[test]
    fn markup_deduplicates_classes() {
        let mut markup = Markup::default();
        markup.add_class(NodeId(2), LABELLED_CLASS);
        markup.add_class(NodeId(2), LABELLED_CLASS);
        markup.add_style(NodeId(3), "counter-reset:la-label2".to_string());

        assert_eq!(markup.classes(NodeId(2)), [LABELLED_CLASS]);
        assert_eq!(markup.styles(NodeId(3)), ["counter-reset:la-label2"]);
        assert!(markup.classes(NodeId(9)).is_empty());
    }
}
