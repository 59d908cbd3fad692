//! Exit codes for the markpack CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-3: Operational outcomes (the run finished; the code says how it went)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: I/O failures

use mp_archive::{ArchiveError, PackReport, SplitReport};
use mp_config::ConfigError;

/// Exit codes for markpack operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-3)
    // ========================================================================
    /// One or more files written, every write succeeded
    Clean = 0,

    /// Run completed but no files were written
    NothingWritten = 1,

    /// Some entries could not be written
    PartialFail = 3,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments or marker templates
    ArgsError = 10,

    /// Settings file missing, unparsable or invalid
    ConfigError = 11,

    /// Archive to split does not exist
    SourceMissing = 12,

    // ========================================================================
    // I/O Failures (20-29)
    // ========================================================================
    /// Reading or writing failed outside a single entry
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates full success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code indicates any error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::NothingWritten => "OK_NOTHING_WRITTEN",
            ExitCode::PartialFail => "ERR_PARTIAL",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::SourceMissing => "ERR_SOURCE_MISSING",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Outcome of a completed split.
    pub fn for_split(report: &SplitReport) -> Self {
        if report.failures() > 0 {
            ExitCode::PartialFail
        } else if report.files_written() == 0 {
            ExitCode::NothingWritten
        } else {
            ExitCode::Clean
        }
    }

    /// Outcome of a completed pack.
    pub fn for_pack(report: &PackReport) -> Self {
        if report.files_packed() == 0 {
            ExitCode::NothingWritten
        } else {
            ExitCode::Clean
        }
    }
}

impl From<&ArchiveError> for ExitCode {
    fn from(err: &ArchiveError) -> Self {
        match err {
            ArchiveError::SourceNotFound { .. } => ExitCode::SourceMissing,
            ArchiveError::Template { .. }
            | ArchiveError::Pattern(_)
            | ArchiveError::MarkerCollision { .. }
            | ArchiveError::NotUtf8 { .. }
            | ArchiveError::CarriageReturn { .. }
            | ArchiveError::EntryPath { .. } => ExitCode::ArgsError,
            ArchiveError::EmptyArchive => ExitCode::NothingWritten,
            ArchiveError::Io(_) | ArchiveError::Read { .. } => ExitCode::IoError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::IoError { .. } => ExitCode::IoError,
            ConfigError::NotFound { .. }
            | ConfigError::ParseError { .. }
            | ConfigError::ValidationError(_) => ExitCode::ConfigError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_archive::{Diagnostic, MemorySink, SplitOptions, Splitter};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn split(input: &str) -> SplitReport {
        Splitter::new(SplitOptions::default())
            .split(Cursor::new(input.as_bytes()), &mut MemorySink::new())
            .unwrap()
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::NothingWritten.as_i32(), 1);
        assert_eq!(ExitCode::PartialFail.as_i32(), 3);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::SourceMissing.as_i32(), 12);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_exit_code_classification() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::NothingWritten.is_success());
        assert!(!ExitCode::NothingWritten.is_error());
        assert!(!ExitCode::PartialFail.is_error());
        assert!(ExitCode::ConfigError.is_error());
        assert!(ExitCode::IoError.is_error());
    }

    #[test]
    fn test_split_outcomes() {
        assert_eq!(ExitCode::for_split(&split("nothing here\n")), ExitCode::NothingWritten);
        assert_eq!(
            ExitCode::for_split(&split("/* ===== START: a ===== */\nx\n")),
            ExitCode::Clean
        );

        let mut report = split("/* ===== START: a ===== */\nx\n");
        report.diagnostics.push(Diagnostic::WriteFailed {
            path: "b".to_string(),
            error: "denied".to_string(),
        });
        assert_eq!(ExitCode::for_split(&report), ExitCode::PartialFail);
    }

    #[test]
    fn test_warnings_do_not_change_outcome() {
        let report = split(
            "/* ===== START: a ===== */\nx\n/* ===== END: b ===== */\n",
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(ExitCode::for_split(&report), ExitCode::Clean);
    }

    #[test]
    fn test_archive_error_mapping() {
        let missing = ArchiveError::SourceNotFound {
            path: PathBuf::from("x"),
        };
        assert_eq!(ExitCode::from(&missing), ExitCode::SourceMissing);
        assert_eq!(
            ExitCode::from(&ArchiveError::EmptyArchive),
            ExitCode::NothingWritten
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::PartialFail.to_string(), "ERR_PARTIAL (3)");
    }
}
