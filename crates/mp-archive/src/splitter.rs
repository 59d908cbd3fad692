//! Archive splitter: turns a marker-delimited text stream back into files.
//!
//! The scan is a single forward pass holding at most one pending entry. An
//! entry is flushed when its end marker arrives, when another start marker
//! interrupts it, or (if it has content) when the stream ends.

use crate::report::{Diagnostic, SplitReport, WrittenFile};
use crate::sink::{escapes_root, DirSink, EntrySink};
use crate::{ArchiveError, MarkerKind, MarkerSet, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Options controlling a split.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Start and (optional) end marker patterns.
    pub markers: MarkerSet,

    /// Refuse entries whose path would land outside the output root.
    pub confine_paths: bool,
}

impl SplitOptions {
    pub fn new(markers: MarkerSet) -> Self {
        Self {
            markers,
            confine_paths: false,
        }
    }

    pub fn with_confine_paths(mut self, enabled: bool) -> Self {
        self.confine_paths = enabled;
        self
    }
}

/// The entry currently being accumulated.
#[derive(Debug)]
struct PendingEntry {
    path: String,
    lines: Vec<String>,
}

impl PendingEntry {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            lines: Vec::new(),
        }
    }

    /// Lines joined with `\n` plus a trailing newline.
    fn render(&self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }
}

/// Splits archives according to a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    options: SplitOptions,
}

impl Splitter {
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Scan `reader` and hand each finished entry to `sink`.
    ///
    /// Only stream-level failures (an unreadable line) return `Err`; anything
    /// wrong with an individual entry ends up in the report's diagnostics.
    pub fn split<R: BufRead, S: EntrySink>(&self, reader: R, sink: &mut S) -> Result<SplitReport> {
        let markers = &self.options.markers;
        let mut report = SplitReport::default();
        let mut pending: Option<PendingEntry> = None;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|source| ArchiveError::Read {
                line: line_number,
                source,
            })?;
            report.lines_read = line_number;

            match markers.classify(&line) {
                Some((MarkerKind::Start, path)) => {
                    if let Some(previous) = pending.take() {
                        warn!(
                            path = %previous.path,
                            line = line_number,
                            "New file started before previous one ended; writing previous content"
                        );
                        report.diagnostics.push(Diagnostic::Interrupted {
                            path: previous.path.clone(),
                            line: line_number,
                        });
                        self.flush(previous, sink, &mut report);
                    }
                    debug!(path, line = line_number, "Found start of file");
                    pending = Some(PendingEntry::new(path));
                }
                Some((MarkerKind::End, path)) if pending.is_some() => {
                    if let Some(current) = pending.take() {
                        if path != current.path {
                            warn!(
                                start_path = %current.path,
                                end_path = path,
                                line = line_number,
                                "End marker path does not match start marker path"
                            );
                            report.diagnostics.push(Diagnostic::PathMismatch {
                                start_path: current.path.clone(),
                                end_path: path.to_string(),
                                line: line_number,
                            });
                        }
                        debug!(path = %current.path, line = line_number, "Found end of file");
                        self.flush(current, sink, &mut report);
                    }
                }
                _ => {
                    if let Some(current) = pending.as_mut() {
                        current.lines.push(line);
                    }
                }
            }
        }

        if let Some(last) = pending.take() {
            if last.lines.is_empty() {
                debug!(path = %last.path, "Dropping empty entry at end of archive");
            } else {
                debug!(path = %last.path, "End of archive reached before end marker");
                self.flush(last, sink, &mut report);
            }
        }

        info!(
            files = report.files_written(),
            failures = report.failures(),
            diagnostics = report.diagnostics.len(),
            lines = report.lines_read,
            "Archive split"
        );

        Ok(report)
    }

    fn flush<S: EntrySink>(&self, entry: PendingEntry, sink: &mut S, report: &mut SplitReport) {
        if self.options.confine_paths && escapes_root(&entry.path) {
            warn!(path = %entry.path, "Refusing path outside the output root");
            report.diagnostics.push(Diagnostic::Escaped { path: entry.path });
            return;
        }

        let content = entry.render();
        match sink.write_entry(&entry.path, content.as_bytes()) {
            Ok(target) => {
                debug!(
                    path = %entry.path,
                    target = %target.display(),
                    lines = entry.lines.len(),
                    "Created file"
                );
                report.files.push(WrittenFile::new(
                    &entry.path,
                    target,
                    entry.lines.len(),
                    content.as_bytes(),
                ));
            }
            Err(e) => {
                error!(path = %entry.path, error = %e, "Failed to write file");
                report.diagnostics.push(Diagnostic::WriteFailed {
                    path: entry.path,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Split the archive at `archive` into files under `output_root`.
///
/// A missing archive is fatal and nothing is written. The output root is
/// created if it does not exist.
pub fn split_file(archive: &Path, output_root: &Path, options: &SplitOptions) -> Result<SplitReport> {
    let reader = open_archive(archive)?;

    info!(
        archive = %archive.display(),
        output = %output_root.display(),
        "Unpacking archive"
    );

    let mut sink = DirSink::create(output_root)?;
    Splitter::new(options.clone()).split(reader, &mut sink)
}

/// Open an archive for reading, mapping a missing file to `SourceNotFound`.
pub fn open_archive(archive: &Path) -> Result<BufReader<File>> {
    if !archive.exists() {
        return Err(ArchiveError::SourceNotFound {
            path: archive.to_path_buf(),
        });
    }
    Ok(BufReader::new(File::open(archive)?))
}
