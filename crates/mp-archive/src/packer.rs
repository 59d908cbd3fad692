//! Archive packer: concatenates files into one marker-delimited text stream.
//!
//! Output layout per entry:
//!
//! ```text
//! /* ===== START: dir/file.txt ===== */
//! ...file content...
//! /* ===== END: dir/file.txt ===== */
//! ```
//!
//! Entries are separated by a blank line when end markers are in use. Without
//! end markers a separator would become part of the previous entry, so none
//! is written.

use crate::report::{compute_checksum, PackReport, PackedEntry};
use crate::{ArchiveError, MarkerSet, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Builds archives using a fixed marker set.
#[derive(Debug, Clone, Default)]
pub struct Packer {
    markers: MarkerSet,
}

impl Packer {
    pub fn new(markers: MarkerSet) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Pack `entries` (paths relative to `base_dir`) into `writer`.
    ///
    /// All files are read and checked before anything is written, so a
    /// marker collision or unreadable file leaves `writer` untouched.
    pub fn pack<W: Write>(
        &self,
        base_dir: &Path,
        entries: &[String],
        mut writer: W,
    ) -> Result<PackReport> {
        let mut report = PackReport::default();
        let mut loaded: Vec<(String, String)> = Vec::with_capacity(entries.len());

        for entry in entries {
            self.check_entry_path(entry)?;

            let source = base_dir.join(entry);
            if !source.is_file() {
                warn!(path = %entry, "File not found; skipping");
                report.skipped.push(entry.clone());
                continue;
            }

            let data = fs::read(&source)?;
            let checksum = compute_checksum(&data);
            let bytes = data.len() as u64;
            let content = String::from_utf8(data).map_err(|_| ArchiveError::NotUtf8 {
                path: entry.clone(),
            })?;

            check_line_endings(entry, &content)?;
            self.check_collisions(entry, &content)?;

            report.entries.push(PackedEntry {
                path: entry.clone(),
                lines: content.lines().count(),
                bytes,
                sha256: checksum,
            });
            loaded.push((entry.clone(), content));
        }

        if loaded.is_empty() {
            return Err(ArchiveError::EmptyArchive);
        }

        for (index, (path, content)) in loaded.iter().enumerate() {
            if index > 0 && self.markers.end.is_some() {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", self.markers.start.render(path))?;
            writer.write_all(content.as_bytes())?;
            if !content.is_empty() && !content.ends_with('\n') {
                writeln!(writer)?;
            }
            if let Some(end) = &self.markers.end {
                writeln!(writer, "{}", end.render(path))?;
            }
            debug!(path = %path, bytes = content.len(), "Added file to archive");
        }
        writer.flush()?;

        info!(
            files = report.files_packed(),
            skipped = report.skipped.len(),
            "Archive packed"
        );

        Ok(report)
    }

    /// Pack into a file at `output`, replacing it.
    pub fn pack_to_file(
        &self,
        base_dir: &Path,
        entries: &[String],
        output: &Path,
    ) -> Result<PackReport> {
        let mut buffer = Vec::new();
        let report = self.pack(base_dir, entries, &mut buffer)?;
        fs::write(output, buffer)?;
        info!(path = %output.display(), "Archive written");
        Ok(report)
    }

    fn check_entry_path(&self, path: &str) -> Result<()> {
        let start = &self.markers.start;
        let reason = if path.contains(['\n', '\r']) {
            "line breaks cannot appear in a marker"
        } else if path.trim() != path {
            "leading or trailing whitespace is trimmed when the archive is split"
        } else if start.matches(&start.render(path)) != Some(path) {
            "the path does not read back unchanged from its start marker"
        } else {
            return Ok(());
        };
        Err(ArchiveError::EntryPath {
            path: path.to_string(),
            reason: reason.to_string(),
        })
    }

    fn check_collisions(&self, path: &str, content: &str) -> Result<()> {
        for (index, line) in content.lines().enumerate() {
            if self.markers.classify(line).is_some() {
                return Err(ArchiveError::MarkerCollision {
                    path: path.to_string(),
                    line: index + 1,
                });
            }
        }
        Ok(())
    }
}

/// The splitter strips `\r\n` terminators, and a trailing `\r` turns into
/// one once the packer adds the final newline.
fn check_line_endings(path: &str, content: &str) -> Result<()> {
    match content.split('\n').position(|line| line.ends_with('\r')) {
        Some(index) => Err(ArchiveError::CarriageReturn {
            path: path.to_string(),
            line: index + 1,
        }),
        None => Ok(()),
    }
}

/// Every regular file under `root`, as sorted `/`-separated relative paths.
pub fn collect_tree(root: &Path) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    walk(root, "", &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn walk(dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        let relative = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };

        if file_type.is_dir() {
            walk(&entry.path(), &relative, out)?;
        } else if file_type.is_file() {
            out.push(relative);
        }
    }
    Ok(())
}
