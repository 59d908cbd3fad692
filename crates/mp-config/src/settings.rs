//! Typed settings file (`markpack.toml`).
//!
//! # Example
//!
//! ```toml
//! [markers]
//! start = "/* ===== START: {path} ===== */"
//! end = "/* ===== END: {path} ===== */"
//! end_markers = true
//!
//! [split]
//! archive = "combined_selected_output.txt"
//! output_dir = "."
//! confine_paths = false
//!
//! [pack]
//! output = "combined_selected_output.txt"
//! base_dir = "."
//! include = ["client/index.html", "server/server.js"]
//! ```
//!
//! Every section and field is optional.

use mp_archive::{MarkerSet, DEFAULT_END_TEMPLATE, DEFAULT_START_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Default archive file name for both split input and pack output.
pub const DEFAULT_ARCHIVE_NAME: &str = "combined_selected_output.txt";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub markers: MarkerSettings,
    pub split: SplitSettings,
    pub pack: PackSettings,
}

/// Marker line templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerSettings {
    /// Start marker template with one `{path}` placeholder.
    pub start: String,
    /// End marker template with one `{path}` placeholder.
    pub end: String,
    /// When false, entries end at the next start marker or end of file.
    pub end_markers: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_TEMPLATE.to_string(),
            end: DEFAULT_END_TEMPLATE.to_string(),
            end_markers: true,
        }
    }
}

impl MarkerSettings {
    /// Compile the templates.
    pub fn marker_set(&self) -> mp_archive::Result<MarkerSet> {
        let end = self.end_markers.then_some(self.end.as_str());
        MarkerSet::from_templates(&self.start, end)
    }
}

/// Split defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitSettings {
    /// Archive to unpack.
    pub archive: PathBuf,
    /// Root the files are recreated under.
    pub output_dir: PathBuf,
    /// Refuse entries whose path leaves `output_dir`.
    pub confine_paths: bool,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            archive: PathBuf::from(DEFAULT_ARCHIVE_NAME),
            output_dir: PathBuf::from("."),
            confine_paths: false,
        }
    }
}

/// Pack defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackSettings {
    /// Archive to write.
    pub output: PathBuf,
    /// Directory the include paths are relative to.
    pub base_dir: PathBuf,
    /// Files to pack, in order.
    pub include: Vec<String>,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_ARCHIVE_NAME),
            base_dir: PathBuf::from("."),
            include: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. `path` is only used in errors.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
