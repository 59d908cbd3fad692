//! Command payload rendering.
//!
//! Payloads go to stdout; logs stay on stderr.

use crate::exit_codes::ExitCode;
use clap::ValueEnum;
use mp_archive::{PackReport, SplitReport};
use mp_config::LoadedSettings;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;

/// Schema version stamped on JSON payloads.
pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary (default)
    #[default]
    Summary,

    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// What a split run was pointed at.
#[derive(Debug, Clone, Copy)]
pub struct SplitContext<'a> {
    pub archive: &'a Path,
    pub output_dir: &'a Path,
    pub dry_run: bool,
}

/// Render the outcome of a split.
pub fn render_split(
    format: OutputFormat,
    ctx: SplitContext<'_>,
    report: &SplitReport,
    code: ExitCode,
) -> String {
    match format {
        OutputFormat::Json => json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "command": "split",
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "archive": ctx.archive,
            "output_dir": ctx.output_dir,
            "dry_run": ctx.dry_run,
            "files_written": report.files_written(),
            "failures": report.failures(),
            "bytes": report.total_bytes(),
            "lines_read": report.lines_read,
            "files": report.files,
            "diagnostics": report.diagnostics,
            "exit_code": code.as_i32(),
            "exit_code_name": code.code_name(),
        })
        .to_string(),
        OutputFormat::Summary => {
            let mut out = String::new();
            let verb = if ctx.dry_run { "Would create" } else { "Created" };
            for file in &report.files {
                let _ = writeln!(out, "  {verb} file: {}", file.target.display());
            }
            for diag in &report.diagnostics {
                let label = if diag.is_failure() { "error" } else { "warning" };
                let _ = writeln!(out, "  {label}: {diag}");
            }

            if report.files_written() > 0 {
                let verb = if ctx.dry_run { "Would unpack" } else { "Successfully unpacked" };
                let _ = write!(
                    out,
                    "{verb} {} file{} into '{}'.",
                    report.files_written(),
                    plural(report.files_written()),
                    ctx.output_dir.display()
                );
            } else {
                let _ = write!(
                    out,
                    "No files were unpacked. Check your markers and '{}'.",
                    ctx.archive.display()
                );
            }
            if report.failures() > 0 {
                let _ = write!(
                    out,
                    " {} file{} could not be written.",
                    report.failures(),
                    plural(report.failures())
                );
            }
            out
        }
    }
}

/// Render the outcome of a pack.
pub fn render_pack(
    format: OutputFormat,
    output: &Path,
    report: &PackReport,
    code: ExitCode,
) -> String {
    match format {
        OutputFormat::Json => json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "command": "pack",
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "output": output,
            "files_packed": report.files_packed(),
            "entries": report.entries,
            "skipped": report.skipped,
            "exit_code": code.as_i32(),
            "exit_code_name": code.code_name(),
        })
        .to_string(),
        OutputFormat::Summary => {
            let mut out = String::new();
            for skipped in &report.skipped {
                let _ = writeln!(out, "  warning: file not found: {skipped}");
            }
            let _ = write!(
                out,
                "Packed {} file{} into '{}'.",
                report.files_packed(),
                plural(report.files_packed()),
                output.display()
            );
            out
        }
    }
}

/// Render the resolved configuration.
pub fn render_check(format: OutputFormat, loaded: &LoadedSettings) -> String {
    match format {
        OutputFormat::Json => json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "command": "check",
            "status": "ok",
            "source": loaded.source.to_string(),
            "path": loaded.path,
            "settings": loaded.settings,
        })
        .to_string(),
        OutputFormat::Summary => {
            let mut out = String::new();
            match &loaded.path {
                Some(path) => {
                    let _ = writeln!(out, "# config: {} ({})", path.display(), loaded.source);
                }
                None => {
                    let _ = writeln!(out, "# config: {}", loaded.source);
                }
            }
            match loaded.settings.to_toml() {
                Ok(toml) => out.push_str(&toml),
                Err(e) => {
                    let _ = writeln!(out, "# could not render settings: {e}");
                }
            }
            let _ = write!(out, "# configuration OK");
            out
        }
    }
}

/// Render a fatal error. JSON errors go to stdout like any payload; summary
/// errors are meant for stderr.
pub fn render_error(format: OutputFormat, command: &str, code: ExitCode, message: &str) -> String {
    match format {
        OutputFormat::Json => json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "command": command,
            "error": message,
            "exit_code": code.as_i32(),
            "exit_code_name": code.code_name(),
        })
        .to_string(),
        OutputFormat::Summary => format!("Error: {message}"),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
