//! Destinations for split entries.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Somewhere the splitter can put a finished entry.
///
/// Writing the same path twice must replace the earlier content.
pub trait EntrySink {
    /// Store `data` under the marker path `path` and return where it went.
    fn write_entry(&mut self, path: &str, data: &[u8]) -> io::Result<PathBuf>;
}

/// Writes entries as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    /// Create a sink rooted at `root`, creating the directory if needed.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Output directory ensured");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl EntrySink for DirSink {
    fn write_entry(&mut self, path: &str, data: &[u8]) -> io::Result<PathBuf> {
        let target = self.root.join(path);

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(dir = %parent.display(), "Created directory");
            }
        }

        fs::write(&target, data)?;
        Ok(target)
    }
}

/// Collects entries in memory. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content stored for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Content stored for `path` as text.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|data| std::str::from_utf8(data).ok())
    }

    /// Stored paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl EntrySink for MemorySink {
    fn write_entry(&mut self, path: &str, data: &[u8]) -> io::Result<PathBuf> {
        self.files.insert(path.to_string(), data.to_vec());
        Ok(PathBuf::from(path))
    }
}

/// True if joining `path` onto a root could land outside that root.
///
/// Absolute paths and `..` components that climb above the start both count.
/// Purely lexical; symlinks are not followed.
pub fn escapes_root(path: &str) -> bool {
    let mut depth: usize = 0;
    for component in Path::new(path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return true,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
            }
            Component::Normal(_) => depth += 1,
        }
    }
    false
}
