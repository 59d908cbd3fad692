//! Outcome records for split and pack runs.
//!
//! Reports carry everything the caller needs to tell the user what happened:
//! one entry per file written and one [`Diagnostic`] per anomaly the scan
//! recovered from.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// A file reconstructed from the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    /// Path as named by the start marker.
    pub path: String,

    /// Where it was written (the output root joined with `path`).
    pub target: PathBuf,

    /// Number of content lines.
    pub lines: usize,

    /// Size in bytes.
    pub bytes: u64,

    /// SHA-256 of the written bytes (64 hex characters).
    pub sha256: String,
}

impl WrittenFile {
    pub(crate) fn new(path: &str, target: PathBuf, lines: usize, data: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            target,
            lines,
            bytes: data.len() as u64,
            sha256: compute_checksum(data),
        }
    }
}

/// A non-fatal anomaly seen while splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A start marker arrived while `path` was still open.
    Interrupted { path: String, line: usize },

    /// The end marker named a different path than the start marker.
    PathMismatch {
        start_path: String,
        end_path: String,
        line: usize,
    },

    /// Writing `path` failed.
    WriteFailed { path: String, error: String },

    /// `path` points outside the output root and confinement is on.
    Escaped { path: String },
}

impl Diagnostic {
    /// True for diagnostics that mean an entry was not written.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Diagnostic::WriteFailed { .. } | Diagnostic::Escaped { .. }
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Interrupted { path, line } => write!(
                f,
                "line {line}: new file started before '{path}' ended; wrote previous content"
            ),
            Diagnostic::PathMismatch {
                start_path,
                end_path,
                line,
            } => write!(
                f,
                "line {line}: end marker '{end_path}' does not match start marker '{start_path}'; wrote '{start_path}'"
            ),
            Diagnostic::WriteFailed { path, error } => {
                write!(f, "failed to write '{path}': {error}")
            }
            Diagnostic::Escaped { path } => {
                write!(f, "refused '{path}': path escapes the output root")
            }
        }
    }
}

/// Result of a split run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitReport {
    /// Files written, in archive order.
    pub files: Vec<WrittenFile>,

    /// Anomalies, in archive order.
    pub diagnostics: Vec<Diagnostic>,

    /// Total lines consumed from the archive.
    pub lines_read: usize,
}

impl SplitReport {
    /// Number of successful flushes.
    pub fn files_written(&self) -> usize {
        self.files.len()
    }

    /// Number of entries that could not be written.
    pub fn failures(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_failure()).count()
    }

    /// Total bytes written.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }

    /// Find a written file by its marker path.
    pub fn find_file(&self, path: &str) -> Option<&WrittenFile> {
        self.files.iter().rev().find(|f| f.path == path)
    }
}

/// A file appended to an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedEntry {
    /// Path as written into the markers.
    pub path: String,

    /// Content lines written.
    pub lines: usize,

    /// Size of the source file in bytes.
    pub bytes: u64,

    /// SHA-256 of the source file.
    pub sha256: String,
}

/// Result of a pack run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackReport {
    /// Entries written, in order.
    pub entries: Vec<PackedEntry>,

    /// Requested paths that did not exist.
    pub skipped: Vec<String>,
}

impl PackReport {
    pub fn files_packed(&self) -> usize {
        self.entries.len()
    }
}

/// Compute SHA-256 checksum of data.
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_format() {
        let checksum = compute_checksum(b"hello world");
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_report_counts() {
        let mut report = SplitReport::default();
        report
            .files
            .push(WrittenFile::new("a.txt", PathBuf::from("out/a.txt"), 1, b"a\n"));
        report.diagnostics.push(Diagnostic::WriteFailed {
            path: "b.txt".to_string(),
            error: "permission denied".to_string(),
        });
        report.diagnostics.push(Diagnostic::Interrupted {
            path: "a.txt".to_string(),
            line: 3,
        });

        assert_eq!(report.files_written(), 1);
        assert_eq!(report.failures(), 1);
        assert_eq!(report.total_bytes(), 2);
        assert!(report.find_file("a.txt").is_some());
        assert!(report.find_file("b.txt").is_none());
    }

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let diag = Diagnostic::PathMismatch {
            start_path: "a.txt".to_string(),
            end_path: "b.txt".to_string(),
            line: 4,
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "path_mismatch");
        assert_eq!(json["start_path"], "a.txt");
        assert_eq!(json["line"], 4);
    }

    #[test]
    fn test_diagnostic_display_mentions_paths() {
        let diag = Diagnostic::PathMismatch {
            start_path: "a.txt".to_string(),
            end_path: "b.txt".to_string(),
            line: 4,
        };
        let msg = diag.to_string();
        assert!(msg.contains("a.txt"));
        assert!(msg.contains("b.txt"));
        assert!(msg.contains("line 4"));
    }
}
