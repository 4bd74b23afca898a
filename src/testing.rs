//! In-memory filesystem and fixed clock for unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::eviction::Clock;
use crate::fs::{EntryView, Filesystem, Uid};

pub const ME: Uid = 1000;
pub const OTHER: Uid = 0;

/// Fixed "now" shared by the unit tests.
pub fn now() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

pub fn days_ago(days: u64) -> SystemTime {
    now() - Duration::from_secs(days * 86_400)
}

pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

#[derive(Clone)]
struct Node {
    is_dir: bool,
    owner: Uid,
    accessed: SystemTime,
}

#[derive(Default)]
pub struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    listed: RefCell<Vec<PathBuf>>,
    removed: RefCell<usize>,
    broken_lstat: RefCell<HashSet<PathBuf>>,
    broken_remove: RefCell<HashSet<PathBuf>>,
    broken_exists: RefCell<HashSet<PathBuf>>,
    free: RefCell<u64>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, path: &str, is_dir: bool, owner: Uid, accessed: SystemTime) {
        self.nodes.borrow_mut().insert(
            PathBuf::from(path),
            Node {
                is_dir,
                owner,
                accessed,
            },
        );
    }

    pub fn dir(&self, path: &str, owner: Uid, accessed: SystemTime) {
        self.insert(path, true, owner, accessed);
    }

    pub fn file(&self, path: &str, owner: Uid, accessed: SystemTime) {
        self.insert(path, false, owner, accessed);
    }

    /// Symlinks are leaves as far as lstat is concerned.
    pub fn symlink(&self, path: &str, owner: Uid, accessed: SystemTime) {
        self.insert(path, false, owner, accessed);
    }

    pub fn fail_lstat(&self, path: &str) {
        self.broken_lstat.borrow_mut().insert(PathBuf::from(path));
    }

    pub fn fail_remove(&self, path: &str) {
        self.broken_remove.borrow_mut().insert(PathBuf::from(path));
    }

    pub fn fail_exists(&self, path: &str) {
        self.broken_exists.borrow_mut().insert(PathBuf::from(path));
    }

    pub fn set_free_space(&self, bytes: u64) {
        *self.free.borrow_mut() = bytes;
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.borrow().contains_key(Path::new(path))
    }

    pub fn was_listed(&self, path: &str) -> bool {
        self.listed.borrow().iter().any(|p| p == Path::new(path))
    }

    pub fn removals(&self) -> usize {
        *self.removed.borrow()
    }
}

impl Filesystem for MemoryFs {
    fn list_children(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        self.listed.borrow_mut().push(dir.to_path_buf());
        let nodes = self.nodes.borrow();
        match nodes.get(dir) {
            Some(node) if node.is_dir => {}
            Some(_) => return Err(io::Error::other("not a directory")),
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
        }
        Ok(nodes
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn lstat(&self, path: &Path) -> io::Result<EntryView> {
        if self.broken_lstat.borrow().contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        let nodes = self.nodes.borrow();
        let node = nodes
            .get(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        Ok(EntryView {
            path: path.to_path_buf(),
            is_dir: node.is_dir,
            owner: node.owner,
            accessed: node.accessed,
            len: if node.is_dir { 0 } else { 64 },
        })
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        if self.broken_exists.borrow().contains(path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok(self.nodes.borrow().contains_key(path))
    }

    fn free_space(&self, _path: &Path) -> io::Result<u64> {
        Ok(*self.free.borrow())
    }

    fn remove(&self, entry: &EntryView) -> io::Result<()> {
        if self.broken_remove.borrow().contains(&entry.path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(&entry.path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        if nodes.keys().any(|p| p.parent() == Some(entry.path.as_path())) {
            return Err(io::Error::other("directory not empty"));
        }
        nodes.remove(&entry.path);
        // each removal frees a fixed amount
        *self.free.borrow_mut() += 64;
        *self.removed.borrow_mut() += 1;
        Ok(())
    }
}
