//! Shared configuration loader for the eqsvg toolchain.
//!
//! `defaults/eqsvg.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`EqsvgConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/eqsvg.default.toml");

/// Per-project configuration file, picked up from the working directory when present.
pub const PROJECT_CONFIG_FILE: &str = "eqsvg.toml";

/// Top-level configuration consumed by eqsvg applications.
#[derive(Debug, Clone, Deserialize)]
pub struct EqsvgConfig {
    pub color: ColorConfig,
    pub render: RenderConfig,
    pub engine: EngineConfig,
    pub export: ExportConfig,
}

/// Which color resolution strategy the parser applies.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorConfig {
    pub mode: ColorModeSetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeSetting {
    Css,
    Native,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub display_mode: DisplayModeSetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayModeSetting {
    Inline,
    Block,
}

/// External typesetting command. The LaTeX source is passed as the last argument.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub command: String,
    pub args: Vec<String>,
    pub inline_flag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub pixel_density: f32,
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
    pub fn build(self) -> Result<EqsvgConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<EqsvgConfig, ConfigError> {
    Loader::new().build()
}
