//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a split or pack run.
///
/// Per-entry problems during a split (a failed write, a path mismatch) are
/// not errors: they are collected as [`crate::Diagnostic`]s and the scan
/// keeps going.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive to split does not exist
    #[error("archive not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Reading the archive failed part-way through
    #[error("failed to read archive at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// Marker template is malformed
    #[error("invalid marker template '{template}': {reason}")]
    Template { template: String, reason: String },

    /// Compiled marker regex was rejected
    #[error("invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A file to pack contains a line the splitter would read as a marker
    #[error("'{path}' line {line} looks like an archive marker; packing it would corrupt the archive")]
    MarkerCollision { path: String, line: usize },

    /// A file to pack is not valid UTF-8
    #[error("'{path}' is not valid UTF-8 text")]
    NotUtf8 { path: String },

    /// A file to pack has CRLF line endings; splitting reads them back as LF
    #[error("'{path}' line {line} ends with CRLF; archives only preserve LF line endings")]
    CarriageReturn { path: String, line: usize },

    /// An entry path that would not read back unchanged from its marker
    #[error("cannot pack '{path}': {reason}")]
    EntryPath { path: String, reason: String },

    /// Nothing to pack
    #[error("no files to pack")]
    EmptyArchive,
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
