use std::path::PathBuf;

use crate::eviction::Reason;
use crate::utils;

/// One observable decision taken during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupEvent {
    pub path: PathBuf,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Configured extra directory does not exist.
    RootMissing,
    /// A root could not be listed.
    RootUnreadable { error: String },
    /// Metadata lookup failed; the entry was skipped.
    Unreadable { error: String },
    /// Owned by someone else; neither removed nor descended into.
    Foreign,
    Removed { reason: Reason, bytes: u64 },
    /// Dry run: would have been removed.
    WouldRemove { reason: Reason, bytes: u64 },
    RemoveFailed { reason: Reason, error: String },
}

/// Free space on the temp root's filesystem around a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpaceDelta {
    pub before: Option<u64>,
    pub after: Option<u64>,
}

impl SpaceDelta {
    /// Bytes gained (positive) or lost (negative) over the run.
    pub fn freed(&self) -> Option<i64> {
        match (self.before, self.after) {
            (Some(before), Some(after)) => Some(after as i64 - before as i64),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        let freed = self
            .freed()
            .map(utils::format_signed_size)
            .unwrap_or_else(|| "unknown".to_string());
        let available = self
            .after
            .map(utils::format_size)
            .unwrap_or_else(|| "unknown".to_string());
        format!("freed {freed} disk space, available {available}")
    }
}

/// Accumulated result of one run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub events: Vec<CleanupEvent>,
    pub space: SpaceDelta,
    /// Entries whose metadata was read.
    pub examined: usize,
    /// Owned entries left in place because they were not stale.
    pub retained: usize,
    pub dry_run: bool,
}

impl RunReport {
    pub(crate) fn record(&mut self, path: PathBuf, kind: EventKind) {
        self.events.push(CleanupEvent { path, kind });
    }

    pub fn removed(&self) -> impl Iterator<Item = &CleanupEvent> {
        self.events.iter().filter(|e| {
            matches!(
                e.kind,
                EventKind::Removed { .. } | EventKind::WouldRemove { .. }
            )
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &CleanupEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::RemoveFailed { .. }))
    }

    pub fn skipped_roots(&self) -> impl Iterator<Item = &CleanupEvent> {
        self.events.iter().filter(|e| {
            matches!(
                e.kind,
                EventKind::RootMissing | EventKind::RootUnreadable { .. }
            )
        })
    }

    pub fn foreign_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Foreign)
            .count()
    }

    pub fn removed_count(&self) -> usize {
        self.removed().count()
    }

    /// Sum of `lstat` sizes of removed entries.
    pub fn bytes_removed(&self) -> u64 {
        self.removed()
            .map(|e| match e.kind {
                EventKind::Removed { bytes, .. } | EventKind::WouldRemove { bytes, .. } => bytes,
                _ => 0,
            })
            .sum()
    }

    pub fn was_removed(&self, path: &std::path::Path) -> bool {
        self.removed().any(|e| e.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_delta() {
        let delta = SpaceDelta {
            before: Some(1_000),
            after: Some(3_048),
        };
        assert_eq!(delta.freed(), Some(2_048));
        assert_eq!(delta.summary(), "freed +2.00 KB disk space, available 2.98 KB");

        let shrunk = SpaceDelta {
            before: Some(2_048),
            after: Some(0),
        };
        assert_eq!(shrunk.freed(), Some(-2_048));
    }

    #[test]
    fn test_space_delta_unknown() {
        let delta = SpaceDelta {
            before: None,
            after: Some(10),
        };
        assert_eq!(delta.freed(), None);
        assert_eq!(delta.summary(), "freed unknown disk space, available 10 B");
    }

    #[test]
    fn test_report_queries() {
        let mut report = RunReport::default();
        report.record(
            PathBuf::from("/tmp/a"),
            EventKind::Removed {
                reason: Reason::Stale,
                bytes: 10,
            },
        );
        report.record(
            PathBuf::from("/tmp/b"),
            EventKind::RemoveFailed {
                reason: Reason::Stale,
                error: "busy".into(),
            },
        );
        report.record(PathBuf::from("/tmp/c"), EventKind::Foreign);
        report.record(PathBuf::from("/opt/x"), EventKind::RootMissing);

        assert_eq!(report.removed_count(), 1);
        assert_eq!(report.bytes_removed(), 10);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.foreign_count(), 1);
        assert_eq!(report.skipped_roots().count(), 1);
        assert!(report.was_removed(std::path::Path::new("/tmp/a")));
        assert!(!report.was_removed(std::path::Path::new("/tmp/b")));
    }
}
