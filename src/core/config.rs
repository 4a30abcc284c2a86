//! # Configuration Module
//!
//! Configuration for a LessonJoin run. Values come from three layers, applied
//! in order: an optional TOML file, environment variables carrying a prefix,
//! and programmatic overrides. The defaults reproduce the stock lesson layout
//! (`lessons/<topic>/<name>-template.html` plus `N.html` / `N-M.html`
//! fragments, merged into `div.container` before its `footer`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use lessonjoin::core::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_file("lessonjoin.toml")
//!     .with_env_prefix("LESSONJOIN_")
//!     .with_override("lessons_root", "site/lessons")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.output_suffix, ".html");
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::core::error::{JoinError, Result};
use crate::dom::Selector;
use crate::fragment::parse_range;

/// Environment prefix read by the command-line binary.
pub const ENV_PREFIX: &str = "LESSONJOIN_";

/// Settings for one assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_lessons_root")]
    /// Directory holding the topic directories; output pages land here too.
    pub lessons_root: PathBuf,

    #[serde(default = "default_template_suffix")]
    /// File-name suffix that marks a topic's template.
    pub template_suffix: String,

    #[serde(default = "default_output_suffix")]
    /// Suffix appended to the topic name to form the output file name.
    pub output_suffix: String,

    #[serde(default = "default_true")]
    /// Write output through a temporary file renamed into place.
    pub atomic_writes: bool,

    #[serde(default)]
    /// Element names and classes that define the page structure.
    pub markup: MarkupConfig,
}

/// Structural markers looked up in templates and fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupConfig {
    #[serde(default = "default_container_tag")]
    /// Tag of the container element.
    pub container_tag: String,

    #[serde(default = "default_container_class")]
    /// Class of the container element.
    pub container_class: Option<String>,

    #[serde(default = "default_header_tag")]
    /// Tag of the header marker.
    pub header_tag: String,

    #[serde(default = "default_card_class")]
    /// Class of the header marker.
    pub header_class: Option<String>,

    #[serde(default = "default_footer_tag")]
    /// Tag of the footer marker.
    pub footer_tag: String,

    #[serde(default)]
    /// Class of the footer marker; any footer matches when unset.
    pub footer_class: Option<String>,

    #[serde(default = "default_block_tag")]
    /// Tag of a content block.
    pub block_tag: String,

    #[serde(default = "default_card_class")]
    /// Class of a content block.
    pub block_class: Option<String>,
}

impl MarkupConfig {
    /// Selector for the container element.
    pub fn container(&self) -> Selector {
        Selector::new(&self.container_tag, self.container_class.as_deref())
    }

    /// Selector for the header marker.
    pub fn header(&self) -> Selector {
        Selector::new(&self.header_tag, self.header_class.as_deref())
    }

    /// Selector for the footer marker.
    pub fn footer(&self) -> Selector {
        Selector::new(&self.footer_tag, self.footer_class.as_deref())
    }

    /// Selector for a content block.
    pub fn block(&self) -> Selector {
        Selector::new(&self.block_tag, self.block_class.as_deref())
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            container_tag: default_container_tag(),
            container_class: default_container_class(),
            header_tag: default_header_tag(),
            header_class: default_card_class(),
            footer_tag: default_footer_tag(),
            footer_class: None,
            block_tag: default_block_tag(),
            block_class: default_card_class(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lessons_root: default_lessons_root(),
            template_suffix: default_template_suffix(),
            output_suffix: default_output_suffix(),
            atomic_writes: true,
            markup: MarkupConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// A configuration error when a suffix or a markup tag is empty, or when
    /// the template suffix would itself be taken for a fragment name.
    pub fn validate(&self) -> Result<()> {
        if self.template_suffix.is_empty() {
            return Err(JoinError::config_error(
                "Template suffix cannot be empty",
                None,
            ));
        }
        if self.output_suffix.is_empty() {
            return Err(JoinError::config_error(
                "Output suffix cannot be empty",
                None,
            ));
        }
        if parse_range(&self.template_suffix).is_some() {
            return Err(JoinError::config_error(
                format!(
                    "Template suffix '{}' is itself a fragment name",
                    self.template_suffix
                ),
                None,
            ));
        }

        let markup = &self.markup;
        for (name, tag) in [
            ("container_tag", &markup.container_tag),
            ("header_tag", &markup.header_tag),
            ("footer_tag", &markup.footer_tag),
            ("block_tag", &markup.block_tag),
        ] {
            if tag.trim().is_empty() {
                return Err(JoinError::config_error(
                    format!("Markup key {} cannot be empty", name),
                    None,
                ));
            }
        }
        Ok(())
    }

    /// Output path for a topic: `<lessons_root>/<topic><output_suffix>`.
    pub fn output_path(&self, topic: &str) -> PathBuf {
        self.lessons_root
            .join(format!("{}{}", topic, self.output_suffix))
    }
}

/// Builds a [`Config`] from a file, the environment and overrides.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: Vec<(String, TomlValue)>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML configuration file to the builder.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads environment variables starting with `prefix`. The remainder of
    /// the name, lowercased, is the key (`LESSONJOIN_MARKUP__BLOCK_TAG` sets
    /// `markup.block_tag`).
    pub fn with_env_prefix<S: Into<String>>(
        mut self,
        prefix: S,
    ) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Adds a key-value pair that overrides every other source.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Loads, overrides and validates the final configuration.
    pub fn build(self) -> Result<Config> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            Config::default()
        };

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        for (key, value) in self.overrides {
            apply_config_value(&mut config, &key, override_text(value))?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        JoinError::config_error(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        JoinError::config_error(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(config: &mut Config, prefix: &str) -> Result<()> {
    let mut vars: Vec<(String, String)> = env::vars()
        .filter(|(key, _)| key.starts_with(prefix))
        .collect();
    vars.sort();

    for (key, value) in vars {
        let stripped = key[prefix.len()..].trim_start_matches('_');
        let config_key = stripped.to_lowercase().replace("__", ".");
        apply_config_value(config, &config_key, value)?;
    }
    Ok(())
}

// Strings are taken verbatim; TOML rendering would quote or escape them.
fn override_text(value: TomlValue) -> String {
    match value {
        TomlValue::String(text) => text,
        other => other.to_string(),
    }
}

fn apply_config_value(
    config: &mut Config,
    key: &str,
    value_str: String,
) -> Result<()> {
    match key {
        "lessons_root" => config.lessons_root = PathBuf::from(value_str),
        "template_suffix" => config.template_suffix = value_str,
        "output_suffix" => config.output_suffix = value_str,
        "atomic_writes" => {
            config.atomic_writes =
                parse_bool("atomic_writes", &value_str)?;
        }
        _ => match key.split_once('.') {
            Some(("markup", field)) => {
                apply_markup_value(&mut config.markup, field, value_str)?
            }
            _ => {
                return Err(JoinError::config_error(
                    format!("Unknown configuration key: {}", key),
                    None,
                ));
            }
        },
    }
    Ok(())
}

fn apply_markup_value(
    markup: &mut MarkupConfig,
    field: &str,
    value: String,
) -> Result<()> {
    // An empty class clears the filter.
    let class = (!value.is_empty()).then(|| value.clone());
    match field {
        "container_tag" => markup.container_tag = value,
        "container_class" => markup.container_class = class,
        "header_tag" => markup.header_tag = value,
        "header_class" => markup.header_class = class,
        "footer_tag" => markup.footer_tag = value,
        "footer_class" => markup.footer_class = class,
        "block_tag" => markup.block_tag = value,
        "block_class" => markup.block_class = class,
        _ => {
            return Err(JoinError::config_error(
                format!("Unknown markup key: {}", field),
                None,
            ));
        }
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|e| {
        JoinError::config_error(
            format!("Invalid {} value '{}': {}", key, value, e),
            None,
        )
    })
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_lessons_root() -> PathBuf {
    PathBuf::from("lessons")
}

fn default_template_suffix() -> String {
    "-template.html".to_string()
}

fn default_output_suffix() -> String {
    ".html".to_string()
}

fn default_container_tag() -> String {
    "div".to_string()
}

fn default_container_class() -> Option<String> {
    Some("container".to_string())
}

fn default_header_tag() -> String {
    "header".to_string()
}

fn default_footer_tag() -> String {
    "footer".to_string()
}

fn default_block_tag() -> String {
    "section".to_string()
}

fn default_card_class() -> Option<String> {
    Some("card".to_string())
}
