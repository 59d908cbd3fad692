//! Marker-delimited text archives.
//!
//! An archive is a plain text file holding many files back to back. Each one
//! is introduced by a start marker naming its relative path and, optionally,
//! closed by an end marker repeating it:
//!
//! ```text
//! /* ===== START: client/js/main.js ===== */
//! ...file content...
//! /* ===== END: client/js/main.js ===== */
//! ```
//!
//! [`Splitter`] reads such a stream forward once and recreates the files under
//! an output root. [`Packer`] builds an archive from files on disk.
//!
//! # Example
//!
//! ```no_run
//! use mp_archive::{split_file, Packer, SplitOptions};
//! use std::path::Path;
//!
//! let packer = Packer::default();
//! let entries = mp_archive::collect_tree(Path::new("project")).unwrap();
//! packer
//!     .pack_to_file(Path::new("project"), &entries, Path::new("combined.txt"))
//!     .unwrap();
//!
//! let report = split_file(
//!     Path::new("combined.txt"),
//!     Path::new("restored"),
//!     &SplitOptions::default(),
//! )
//! .unwrap();
//! println!("{} files written", report.files_written());
//! ```

pub mod error;
pub mod marker;
pub mod packer;
pub mod report;
pub mod sink;
pub mod splitter;

pub use error::{ArchiveError, Result};
pub use marker::{
    MarkerKind, MarkerPattern, MarkerSet, DEFAULT_END_TEMPLATE, DEFAULT_START_TEMPLATE,
    PATH_PLACEHOLDER,
};
pub use packer::{collect_tree, Packer};
pub use report::{Diagnostic, PackReport, PackedEntry, SplitReport, WrittenFile};
pub use sink::{escapes_root, DirSink, EntrySink, MemorySink};
pub use splitter::{open_archive, split_file, SplitOptions, Splitter};
