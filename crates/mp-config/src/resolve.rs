//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path →
//! working directory → built-in defaults.

use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Where the settings file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in the current working directory.
    WorkingDirectory,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::WorkingDirectory => write!(f, "working directory"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable naming the settings file directly.
pub const ENV_CONFIG_PATH: &str = "MARKPACK_CONFIG";

/// Environment variable naming a directory holding `markpack.toml`.
pub const ENV_CONFIG_DIR: &str = "MARKPACK_CONFIG_DIR";

/// Standard settings file name.
pub const CONFIG_FILENAME: &str = "markpack.toml";

/// Application name for XDG directories.
const APP_NAME: &str = "markpack";

/// Resolved settings file location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPath {
    /// Settings file (None when using defaults).
    pub path: Option<PathBuf>,
    /// How it was found.
    pub source: ConfigSource,
}

/// Find the settings file using the standard resolution order.
///
/// 1. Explicit CLI path (must exist)
/// 2. `MARKPACK_CONFIG` (must exist)
/// 3. `MARKPACK_CONFIG_DIR` + `markpack.toml`
/// 4. XDG config directory (`~/.config/markpack/markpack.toml`)
/// 5. `./markpack.toml`
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> Result<ConfigPath, ConfigError> {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return explicit(path.to_path_buf(), ConfigSource::CliArgument);
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.is_empty() {
            return explicit(PathBuf::from(env_path), ConfigSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.is_file() {
            return Ok(found(path, ConfigSource::Environment));
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            return Ok(found(path, ConfigSource::XdgConfig));
        }
    }

    // 5. Working directory
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Ok(found(local, ConfigSource::WorkingDirectory));
    }

    // 6. Built-in default
    Ok(ConfigPath::default())
}

fn explicit(path: PathBuf, source: ConfigSource) -> Result<ConfigPath, ConfigError> {
    if path.exists() {
        Ok(found(path, source))
    } else {
        Err(ConfigError::NotFound { path })
    }
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    ConfigPath {
        path: Some(path),
        source,
    }
}

/// Get the XDG config directory for markpack.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::WorkingDirectory),
            "working directory"
        );
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let err = resolve_config(Some(Path::new("/definitely/not/here/markpack.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
