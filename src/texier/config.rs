//! Configuration loading
//!
//! `defaults/texier.default.toml` is embedded into the crate so the documented
//! defaults and the runtime behavior stay in sync. Callers layer their own files
//! and overrides on top with [`Loader`] before deserializing into
//! [`TexierConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/texier.default.toml");

/// Top-level configuration of a processor.
#[derive(Debug, Clone, Deserialize)]
pub struct TexierConfig {
    pub productions: ProductionsConfig,
    pub phrase: PhraseConfig,
    pub html: HtmlConfig,
    pub heading: HeadingConfig,
    pub list: ListConfig,
    pub smilies: SmiliesConfig,
    pub policy: PolicyConfig,
}

/// Production names switched after registration. `disabled` wins when a name
/// appears in both lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductionsConfig {
    #[serde(default)]
    pub enabled: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseConfig {
    pub links_allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlConfig {
    pub pass_comments: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingConfig {
    pub top: u8,
    pub balancing: Balancing,
    pub more_means_higher: bool,
    #[serde(default)]
    pub generate_id: bool,
    pub id_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Balancing {
    Dynamic,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub bullets: Vec<BulletConfig>,
}

/// One row of the bullet table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletConfig {
    /// Pattern of the first item's marker, including trailing blanks.
    pub pattern: String,
    pub ordered: bool,
    /// `list-style-type` of the rendered list.
    #[serde(default)]
    pub style: Option<String>,
    /// Marker of the following items, when it differs from `pattern`.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmiliesConfig {
    pub root: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub icons: Vec<SmileyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmileyConfig {
    pub glyph: String,
    pub file: String,
}

/// Allow-lists for passthrough HTML and modifiers. `"*"` allows everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Allowed tags, each with the attributes allowed on it.
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
    /// Attributes allowed on every allowed tag.
    #[serde(default)]
    pub global_attributes: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Builds a [`TexierConfig`] from layers. The embedded defaults come first;
/// every later layer only has to name the keys it changes, and the last layer
/// to set a key wins.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
        .with_toml(DEFAULT_TOML)
    }

    /// A TOML file that must exist, e.g. one named on the command line.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_file(path.as_ref(), true)
    }

    /// A TOML file that is skipped when absent, e.g. a per-project `texier.toml`.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_file(path.as_ref(), false)
    }

    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// One dotted key, such as `heading.top` or `html.pass_comments`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Fails on unreadable files, malformed TOML and values of the wrong shape,
    /// such as an unknown heading balancing mode.
    pub fn build(self) -> Result<TexierConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn with_toml_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<TexierConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.phrase.links_allowed);
        assert!(config.html.pass_comments);
        assert_eq!(config.heading.top, 1);
        assert_eq!(config.heading.balancing, Balancing::Dynamic);
        assert_eq!(config.heading.id_prefix, "toc-");
        assert!(config.productions.disabled.contains(&"smilies".to_string()));
        assert!(!config.policy.tags.contains_key("script"));
        assert_eq!(config.smilies.icons[0].glyph, ":-)");
    }

    #[test]
    fn test_default_bullet_table_is_ordered_by_specificity() {
        let config = load_defaults().expect("defaults to deserialize");
        let bullets = &config.list.bullets;
        assert_eq!(bullets[0].pattern, r"\*[ \t]+");
        assert!(!bullets[0].ordered);

        let roman = bullets
            .iter()
            .find(|b| b.pattern.starts_with('I'))
            .expect("roman numerals");
        assert_eq!(roman.style.as_deref(), Some("upper-roman"));
        assert_eq!(roman.next.as_deref(), Some(r"[IVX]{1,4}\.?[ \t]+"));
    }

    #[test]
    fn test_dotted_key_overrides() {
        let config = Loader::new()
            .set_override("heading.top", 2i64)
            .expect("override to apply")
            .set_override("heading.balancing", "fixed")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.heading.top, 2);
        assert_eq!(config.heading.balancing, Balancing::Fixed);
    }

    #[test]
    fn test_toml_layer_keeps_other_sections() {
        let config = Loader::new()
            .with_toml("[html]\npass_comments = false\n")
            .build()
            .expect("config to build");
        assert!(!config.html.pass_comments);
        // untouched sections keep their defaults
        assert!(config.phrase.links_allowed);
    }

    #[test]
    fn test_unknown_balancing_is_rejected() {
        let result = Loader::new()
            .set_override("heading.balancing", "sideways")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
