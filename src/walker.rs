//! Depth-first, post-order cleanup of one root.
//!
//! For every child of a directory the walker reads `lstat` metadata, drops
//! entries owned by another uid (without descending into them), recurses
//! into owned directories, prunes directories left empty, and finally
//! removes the child if its last access is older than the cutoff. The
//! emptiness and staleness checks are independent: a directory pruned as
//! empty still gets the staleness check, whose removal then finds nothing.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::eviction::{EvictionPolicy, Reason};
use crate::fs::{EntryView, Filesystem};
use crate::ownership::OwnershipFilter;
use crate::report::{EventKind, RunReport};

pub struct Walker<'a> {
    fs: &'a dyn Filesystem,
    ownership: OwnershipFilter,
    policy: EvictionPolicy,
    dry_run: bool,
    /// Dry run only: entries a real run would have removed by now.
    planned: HashSet<PathBuf>,
}

impl<'a> Walker<'a> {
    pub fn new(
        fs: &'a dyn Filesystem,
        ownership: OwnershipFilter,
        policy: EvictionPolicy,
        dry_run: bool,
    ) -> Self {
        Self {
            fs,
            ownership,
            policy,
            dry_run,
            planned: HashSet::new(),
        }
    }

    /// Clean everything below `root`. The root itself is never removed.
    pub fn walk_root(&mut self, root: &Path, report: &mut RunReport) {
        tracing::debug!(root = %root.display(), "Visiting root");
        let children = match self.fs.list_children(root) {
            Ok(children) => children,
            Err(e) => {
                tracing::info!(root = %root.display(), error = %e, "Cannot list root");
                report.record(
                    root.to_path_buf(),
                    EventKind::RootUnreadable {
                        error: e.to_string(),
                    },
                );
                return;
            }
        };
        self.visit_children(children, report);
    }

    fn visit(&mut self, dir: &Path, report: &mut RunReport) {
        tracing::trace!(dir = %dir.display(), "Visiting directory");
        match self.fs.list_children(dir) {
            Ok(children) => self.visit_children(children, report),
            Err(e) => {
                tracing::info!(dir = %dir.display(), error = %e, "Cannot list directory");
            }
        }
    }

    fn visit_children(&mut self, children: Vec<PathBuf>, report: &mut RunReport) {
        for child in children {
            let entry = match self.fs.lstat(&child) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::info!(path = %child.display(), error = %e, "lstat failed, skipping");
                    report.record(
                        child,
                        EventKind::Unreadable {
                            error: e.to_string(),
                        },
                    );
                    continue;
                }
            };
            report.examined += 1;

            if !self.ownership.owns(&entry) {
                tracing::trace!(
                    path = %entry.path.display(),
                    owner = entry.owner,
                    "Skipping entry we don't own"
                );
                report.record(entry.path, EventKind::Foreign);
                continue;
            }

            let mut gone = false;
            if entry.is_dir {
                self.visit(&entry.path, report);

                match self.remaining_children(&entry.path) {
                    Ok(remaining) if self.policy.should_prune(&entry, remaining) => {
                        gone = self.remove(&entry, Reason::Empty, report);
                    }
                    Ok(remaining) => {
                        tracing::trace!(
                            path = %entry.path.display(),
                            remaining,
                            "Directory is not empty"
                        );
                    }
                    Err(e) => {
                        tracing::debug!(
                            path = %entry.path.display(),
                            error = %e,
                            "Cannot re-list directory"
                        );
                    }
                }
            }

            if self.policy.is_stale(&entry) {
                self.remove(&entry, Reason::Stale, report);
            } else if !gone {
                tracing::trace!(path = %entry.path.display(), "Skipping entry, not old enough");
                report.retained += 1;
            }
        }
    }

    fn remaining_children(&self, dir: &Path) -> io::Result<usize> {
        let children = self.fs.list_children(dir)?;
        Ok(children
            .iter()
            .filter(|child| !self.planned.contains(*child))
            .count())
    }

    /// Returns whether the entry is gone (or, in a dry run, would be).
    fn remove(&mut self, entry: &EntryView, reason: Reason, report: &mut RunReport) -> bool {
        if self.dry_run {
            return self.plan_removal(entry, reason, report);
        }

        match self.fs.remove(entry) {
            Ok(()) => {
                tracing::debug!(path = %entry.path.display(), reason = reason.as_str(), "Deleted");
                report.record(
                    entry.path.clone(),
                    EventKind::Removed {
                        reason,
                        bytes: entry.len,
                    },
                );
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %entry.path.display(),
                    reason = reason.as_str(),
                    "Already gone"
                );
                true
            }
            Err(e) => {
                tracing::info!(
                    path = %entry.path.display(),
                    reason = reason.as_str(),
                    error = %e,
                    "Deletion failed"
                );
                report.record(
                    entry.path.clone(),
                    EventKind::RemoveFailed {
                        reason,
                        error: e.to_string(),
                    },
                );
                false
            }
        }
    }

    /// Dry-run counterpart of a removal: mirrors what `remove_dir` would do,
    /// so a directory that still holds entries is never planned.
    fn plan_removal(&mut self, entry: &EntryView, reason: Reason, report: &mut RunReport) -> bool {
        if self.planned.contains(&entry.path) {
            return true;
        }

        if entry.is_dir {
            match self.remaining_children(&entry.path) {
                Ok(0) => {}
                Ok(remaining) => {
                    tracing::debug!(
                        path = %entry.path.display(),
                        reason = reason.as_str(),
                        remaining,
                        "Would fail to delete non-empty directory"
                    );
                    report.record(
                        entry.path.clone(),
                        EventKind::RemoveFailed {
                            reason,
                            error: "directory not empty".to_string(),
                        },
                    );
                    return false;
                }
                Err(e) => {
                    tracing::debug!(
                        path = %entry.path.display(),
                        error = %e,
                        "Cannot re-list directory"
                    );
                    return false;
                }
            }
        }

        tracing::debug!(
            path = %entry.path.display(),
            reason = reason.as_str(),
            "Would delete"
        );
        self.planned.insert(entry.path.clone());
        report.record(
            entry.path.clone(),
            EventKind::WouldRemove {
                reason,
                bytes: entry.len,
            },
        );
        true
    }
}
