use std::path::{Path, PathBuf};

use crate::error::CleanupError;
use crate::fs::Filesystem;

/// Outcome of probing one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    /// Exists and should be walked.
    Present(PathBuf),
    /// Configured extra directory that does not exist.
    Missing(PathBuf),
}

/// Yields the temp root followed by each extra root in configured order.
///
/// Extra roots are probed lazily, one per `next()`, so a failing probe only
/// surfaces after earlier roots have been handed out.
pub struct RootEnumerator<'a> {
    fs: &'a dyn Filesystem,
    temp_root: Option<&'a Path>,
    extra: std::slice::Iter<'a, PathBuf>,
}

impl<'a> RootEnumerator<'a> {
    pub fn new(fs: &'a dyn Filesystem, temp_root: &'a Path, extra_roots: &'a [PathBuf]) -> Self {
        Self {
            fs,
            temp_root: Some(temp_root),
            extra: extra_roots.iter(),
        }
    }
}

impl Iterator for RootEnumerator<'_> {
    type Item = Result<Root, CleanupError>;

    fn next(&mut self) -> Option<Self::Item> {
        // The temp root is always walked; an unlistable one is reported by the walker.
        if let Some(temp_root) = self.temp_root.take() {
            return Some(Ok(Root::Present(temp_root.to_path_buf())));
        }

        let dir = self.extra.next()?;
        Some(match self.fs.exists(dir) {
            Ok(true) => Ok(Root::Present(dir.clone())),
            Ok(false) => {
                tracing::debug!(dir = %dir.display(), "Extra directory does not exist");
                Ok(Root::Missing(dir.clone()))
            }
            Err(source) => Err(CleanupError::ExtraRoot {
                path: dir.clone(),
                source,
            }),
        })
    }
}
