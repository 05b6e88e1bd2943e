//! Cross-reference placeholders in link text.
//!
//! A link to `#id` whose text contains `##` gets the label of the element
//! `id` refers to. `##H`, `##L`, `##X`, `##H2` (or the braced forms
//! `##{H}`) pick the nearest enclosing heading, list item, any label, or
//! heading at a given level instead. `\##` stands for a literal `##`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{
    assignment::Labelling,
    diagnostics::{Diagnostics, Warning},
};
use crate::domain::{Document, ElementKind, ParentIndicator};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\)?##(\{[^}]*\}|[A-Za-z0-9_-]+)?").expect("placeholder pattern is valid")
});

/// Resolves cross-reference placeholders against a finished [`Labelling`].
#[derive(Debug, Clone, Copy)]
pub struct CrossReferenceResolver<'a> {
    labelling: &'a Labelling,
}

impl<'a> CrossReferenceResolver<'a> {
    /// Creates a resolver over `labelling`.
    #[must_use]
    pub const fn new(labelling: &'a Labelling) -> Self {
        Self { labelling }
    }

    /// Rewrites the text of every link in `document`. Returns how many
    /// links changed.
    pub fn resolve_document<D: Diagnostics>(
        &self,
        document: &mut Document,
        diagnostics: &mut D,
    ) -> usize {
        let mut changed = 0;
        document.for_each_mut(|_, element| {
            if let ElementKind::Link { href, text } = &mut element.kind {
                let resolved = self.resolve(href, text, diagnostics);
                if resolved != *text {
                    *text = resolved;
                    changed += 1;
                }
            }
        });
        debug!(changed, "resolved cross-references");
        changed
    }

    /// The link text `text` with its placeholders replaced, for a link
    /// pointing at `href`.
    ///
    /// Only in-document links (`#id`) are resolved. Placeholders that cannot
    /// be resolved are removed and reported.
    pub fn resolve<D: Diagnostics>(&self, href: &str, text: &str, diagnostics: &mut D) -> String {
        let Some(id) = href.strip_prefix('#') else {
            return text.to_string();
        };
        if !text.contains("##") {
            return text.to_string();
        }

        PLACEHOLDER
            .replace_all(text, |captures: &Captures| {
                let token = captures.get(2).map_or("", |m| m.as_str());
                if captures.get(1).is_some() {
                    return format!("##{token}");
                }

                let (qualifier, trailing) = if let Some(inner) = token
                    .strip_prefix('{')
                    .and_then(|t| t.strip_suffix('}'))
                {
                    match inner.parse::<ParentIndicator>() {
                        Ok(qualifier) => (Some(qualifier), ""),
                        Err(()) => {
                            diagnostics.warn(Warning::InvalidQualifier {
                                href: href.to_string(),
                                qualifier: inner.to_string(),
                            });
                            return String::new();
                        }
                    }
                } else {
                    match token.parse::<ParentIndicator>() {
                        Ok(qualifier) => (Some(qualifier), ""),
                        Err(()) => (None, token),
                    }
                };

                match self.lookup(id, qualifier) {
                    Some(label) => format!("{label}{trailing}"),
                    None => {
                        diagnostics.warn(Warning::UnresolvedReference {
                            href: href.to_string(),
                        });
                        trailing.to_string()
                    }
                }
            })
            .into_owned()
    }

    /// The trimmed label an ID refers to, or the innermost numbered label
    /// around it matching `qualifier`.
    ///
    /// An element that takes labels but has none (suppressed, or deeper
    /// than its template reaches) resolves to nothing. Other elements take
    /// the innermost non-empty label around them.
    fn lookup(&self, id: &str, qualifier: Option<ParentIndicator>) -> Option<&'a str> {
        let anchor = self.labelling.index().get(id)?;
        let display = |assignment: Option<usize>| {
            assignment
                .and_then(|index| self.labelling.assignment(index))
                .map(|assignment| assignment.display.trim())
                .filter(|label| !label.is_empty())
        };
        let mut links = anchor.chain.iter().rev();
        match qualifier {
            None => match self.labelling.label_of(anchor.node) {
                Some(own) => Some(own.display.trim()).filter(|label| !label.is_empty()),
                None => links.find_map(|link| display(link.assignment)),
            },
            Some(qualifier) => links
                .find(|link| link.numbered && qualifier.matches(link.kind))
                .and_then(|link| display(link.assignment)),
        }
    }
}
