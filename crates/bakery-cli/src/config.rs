//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags and `--set` pairs (applied by `bakery new`, not here)
//! 2. Environment variables: `BAKERY_DEFAULTS__FULL_NAME=...`
//! 3. Config file: `--config FILE`, else the platform config directory
//! 4. Built-in defaults
//!
//! ```toml
//! [defaults]
//! full_name = "Ada Lovelace"
//! open_source_license = "BSD-3-Clause"
//! use_pytest = "y"
//!
//! [output]
//! directory = "~/src"
//!
//! [templates]
//! dir = "~/.bakery/templates"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use bakery_core::domain::{defaults, keys};

pub const ENV_PREFIX: &str = "BAKERY";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default option values for new projects.
    pub defaults: ContextDefaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

/// Option defaults, keyed like `bakery options`. Values are validated by the
/// domain when a project is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_source_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_line_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_pytest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_author_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Parent directory for new projects when `bakery new` gets none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template used when `--template` is not given.
    pub default: String,
    /// Extra templates directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            default: "python-package".into(),
            dir: None,
        }
    }
}

impl ContextDefaults {
    /// Configured values as `(option key, value)` pairs.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            (keys::FULL_NAME, &self.full_name),
            (keys::EMAIL, &self.email),
            (keys::GITHUB_USERNAME, &self.github_username),
            (keys::PROJECT_SHORT_DESCRIPTION, &self.project_short_description),
            (keys::VERSION, &self.version),
            (keys::LICENSE, &self.open_source_license),
            (keys::CLI, &self.command_line_interface),
            (keys::USE_PYTEST, &self.use_pytest),
            (keys::FORMATTER, &self.formatter),
            (keys::CREATE_AUTHOR_FILE, &self.create_author_file),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

impl AppConfig {
    /// Layer defaults, the config file and `BAKERY_*` environment variables.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let path = Self::resolve_path(config_file);
        debug!(path = %path.display(), "loading configuration");

        let cfg = Config::builder()
            .add_source(
                Config::try_from(&Self::default()).context("failed to encode built-in defaults")?,
            )
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        cfg.try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// The file `init`, `config set` and `load` operate on.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(Self::config_path, Path::to_path_buf)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.bakery.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "bakery", "bakery")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".bakery.toml"))
    }

    /// Configuration written by `bakery init`: built-in option defaults
    /// spelled out so they are easy to edit.
    pub fn starter() -> Self {
        let yn = |b: bool| if b { "y" } else { "n" }.to_string();
        Self {
            defaults: ContextDefaults {
                full_name: Some(defaults::FULL_NAME.into()),
                email: Some(defaults::EMAIL.into()),
                github_username: Some(defaults::GITHUB_USERNAME.into()),
                project_short_description: Some(defaults::PROJECT_SHORT_DESCRIPTION.into()),
                version: Some(defaults::VERSION.into()),
                open_source_license: Some(defaults::LICENSE.to_string()),
                command_line_interface: Some(defaults::CLI.to_string()),
                use_pytest: Some(yn(defaults::USE_PYTEST)),
                formatter: Some(defaults::FORMATTER.to_string()),
                create_author_file: Some(yn(defaults::CREATE_AUTHOR_FILE)),
            },
            ..Self::default()
        }
    }

    /// Look up a dotted key such as `defaults.full_name`.
    ///
    /// `Some(Value::Null)` means the key exists but is unset.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let value = serde_json::to_value(self).ok()?;
        match value.pointer(&pointer(key)) {
            Some(v) => Some(v.clone()),
            None if Self::is_known_key(key) => Some(serde_json::Value::Null),
            None => None,
        }
    }

    /// Whether `key` names a leaf of the configuration schema.
    pub fn is_known_key(key: &str) -> bool {
        Self::known_keys().iter().any(|k| k == key)
    }

    /// Every leaf key, dotted.
    pub fn known_keys() -> Vec<String> {
        let mut out = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(Self::starter()) {
            for (section, body) in sections {
                if let serde_json::Value::Object(fields) = body {
                    out.extend(fields.keys().map(|f| format!("{section}.{f}")));
                }
            }
        }
        out.push("output.directory".into());
        out.push("templates.dir".into());
        out.sort();
        out.dedup();
        out
    }
}

fn pointer(key: &str) -> String {
    format!("/{}", key.replace('.', "/"))
}
