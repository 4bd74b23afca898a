use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::disk_info;

/// Owner id as reported by `lstat`.
pub type Uid = u32;

/// Read-only view of one filesystem entry, taken without following symlinks.
///
/// A symlink is always a leaf here: `is_dir` is false for it regardless of
/// what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub path: PathBuf,
    pub is_dir: bool,
    pub owner: Uid,
    pub accessed: SystemTime,
    pub len: u64,
}

/// The filesystem operations the walker needs.
pub trait Filesystem {
    /// Children of `dir`, sorted by path.
    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Metadata of `path` itself, never of a symlink target.
    fn lstat(&self, path: &Path) -> io::Result<EntryView>;

    /// `Ok(false)` when the path does not exist; `Err` when that could not
    /// be determined.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Bytes available on the filesystem hosting `path`.
    fn free_space(&self, path: &Path) -> io::Result<u64>;

    /// Single removal attempt. Directories are only removed when empty.
    fn remove(&self, entry: &EntryView) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(e) => {
                    tracing::debug!(
                        dir = %dir.display(),
                        error = %e,
                        "Skipping unreadable directory entry"
                    );
                }
            }
        }
        children.sort();
        Ok(children)
    }

    fn lstat(&self, path: &Path) -> io::Result<EntryView> {
        let meta = std::fs::symlink_metadata(path)?;
        // Fall back to mtime where the platform does not track atime
        let accessed = meta.accessed().or_else(|_| meta.modified())?;
        Ok(EntryView {
            path: path.to_path_buf(),
            is_dir: meta.file_type().is_dir(),
            owner: meta.uid(),
            accessed,
            len: meta.len(),
        })
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn free_space(&self, path: &Path) -> io::Result<u64> {
        disk_info::available_space(path)
    }

    fn remove(&self, entry: &EntryView) -> io::Result<()> {
        if entry.is_dir {
            std::fs::remove_dir(&entry.path)
        } else {
            std::fs::remove_file(&entry.path)
        }
    }
}
