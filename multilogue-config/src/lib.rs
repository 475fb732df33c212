//! Shared configuration loader for the multilogue toolchain.
//!
//! `defaults/multilogue.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`MultilogueConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use multilogue_babel::worker::{MachineConfig, Settings};
use multilogue_babel::{HtmlOptions, Role, ScriptRules};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/multilogue.default.toml");

/// Top-level configuration consumed by multilogue applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MultilogueConfig {
    pub machine: MachineConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    pub script: ScriptConfig,
    pub html: HtmlConfig,
}

/// Generation knobs forwarded to the worker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u64>,
}

impl From<&SettingsConfig> for Settings {
    fn from(config: &SettingsConfig) -> Self {
        let mut settings = Settings::new();
        if let Some(model) = &config.model {
            settings.insert("model", model.as_str().into());
        }
        if let Some(temperature) = config.temperature {
            settings.insert("temperature", temperature.into());
        }
        if let Some(max_tokens) = config.max_tokens {
            settings.insert("max_tokens", max_tokens.into());
        }
        settings
    }
}

/// Mirrors the knobs exposed by the script parser.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    pub default_role: Role,
}

impl From<&ScriptConfig> for ScriptRules {
    fn from(config: &ScriptConfig) -> Self {
        ScriptRules {
            default_role: config.default_role.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub standalone: bool,
    pub title: Option<String>,
    pub custom_css: Option<String>,
}

impl From<&HtmlConfig> for HtmlOptions {
    fn from(config: &HtmlConfig) -> Self {
        HtmlOptions {
            standalone: config.standalone,
            title: config.title.clone(),
            custom_css: config.custom_css.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MultilogueConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MultilogueConfig, ConfigError> {
    Loader::new().build()
}
