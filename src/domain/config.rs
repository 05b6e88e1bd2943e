use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::document::{HeadingLevel, LabelKind};

/// Default label templates and rendering options.
///
/// Templates configured here apply wherever an element carries no `label`
/// directive of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct LabelConfig {
    /// Template for headings, applied at [`heading_level`].
    ///
    /// Deeper headings take the template's later components.
    ///
    /// [`heading_level`]: LabelConfig::heading_level
    pub heading_labels: Option<String>,

    /// The heading level at which `heading_labels` starts.
    pub heading_level: HeadingLevel,

    /// Template for top-level ordered lists; nested ordered lists take its
    /// later components.
    pub ordered_list_labels: Option<String>,

    /// Template for top-level unordered lists.
    pub unordered_list_labels: Option<String>,

    /// Template for figures.
    pub figure_labels: Option<String>,

    /// Template for tables.
    pub table_labels: Option<String>,

    /// Whether list labels are rendered by stylesheet counters rather than
    /// embedded as text.
    pub css_lists: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            heading_labels: None,
            heading_level: HeadingLevel::H1,
            ordered_list_labels: None,
            unordered_list_labels: None,
            figure_labels: None,
            table_labels: None,
            css_lists: false,
        }
    }
}

/// Errors from loading or saving a [`LabelConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The file is not a valid configuration.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

impl LabelConfig {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// The default template source for top-level elements of `kind`.
    ///
    /// Headings only have a default at [`heading_level`]; other levels get
    /// theirs through the enclosing heading's template.
    ///
    /// [`heading_level`]: LabelConfig::heading_level
    #[must_use]
    pub fn template_for(&self, kind: LabelKind) -> Option<&str> {
        match kind {
            LabelKind::Heading { level } if level == self.heading_level => {
                self.heading_labels.as_deref()
            }
            LabelKind::Heading { .. } => None,
            LabelKind::OrderedList => self.ordered_list_labels.as_deref(),
            LabelKind::UnorderedList => self.unordered_list_labels.as_deref(),
            LabelKind::Figure => self.figure_labels.as_deref(),
            LabelKind::Table => self.table_labels.as_deref(),
        }
    }
}

const fn default_heading_level() -> HeadingLevel {
    HeadingLevel::H1
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading_labels: Option<String>,

        #[serde(default = "default_heading_level")]
        heading_level: HeadingLevel,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        ordered_list_labels: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        unordered_list_labels: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        figure_labels: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_labels: Option<String>,

        #[serde(default)]
        css_lists: bool,
    },
}

impl From<Versions> for LabelConfig {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                heading_labels,
                heading_level,
                ordered_list_labels,
                unordered_list_labels,
                figure_labels,
                table_labels,
                css_lists,
            } => Self {
                heading_labels,
                heading_level,
                ordered_list_labels,
                unordered_list_labels,
                figure_labels,
                table_labels,
                css_lists,
            },
        }
    }
}

impl From<LabelConfig> for Versions {
    fn from(config: LabelConfig) -> Self {
        Self::V1 {
            heading_labels: config.heading_labels,
            heading_level: config.heading_level,
            ordered_list_labels: config.ordered_list_labels,
            unordered_list_labels: config.unordered_list_labels,
            figure_labels: config.figure_labels,
            table_labels: config.table_labels,
            css_lists: config.css_lists,
        }
    }
}
