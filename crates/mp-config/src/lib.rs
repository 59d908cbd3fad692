//! markpack configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `markpack.toml`
//! - Config resolution (CLI → env → XDG → working dir → defaults)
//! - Semantic validation of marker templates and paths

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use settings::{MarkerSettings, PackSettings, Settings, SplitSettings, DEFAULT_ARCHIVE_NAME};
pub use validate::{validate_settings, ValidationError, ValidationResult};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

/// Settings together with where they came from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve, load and validate settings.
pub fn load_settings(cli_path: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
    let resolved = resolve_config(cli_path)?;

    let settings = match &resolved.path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    validate_settings(&settings)?;

    Ok(LoadedSettings {
        settings,
        path: resolved.path,
        source: resolved.source,
    })
}
