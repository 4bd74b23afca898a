use std::time::{Duration, SystemTime};

use crate::fs::EntryView;

const SECS_PER_DAY: u64 = 86_400;

pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Point in time before which an entry's last access makes it stale.
///
/// Computed once per run so every entry is judged against the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(SystemTime);

impl Cutoff {
    pub fn from_retention(now: SystemTime, retention_days: u64) -> Self {
        let window = Duration::from_secs(retention_days.saturating_mul(SECS_PER_DAY));
        Self(now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH))
    }

    pub fn at(time: SystemTime) -> Self {
        Self(time)
    }

    pub fn time(&self) -> SystemTime {
        self.0
    }

    /// Strictly before the cutoff; an access exactly at the cutoff is fresh.
    pub fn is_stale(&self, accessed: SystemTime) -> bool {
        accessed < self.0
    }
}

/// Why an entry is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Directory with no children left after its contents were processed.
    Empty,
    /// Last access older than the cutoff.
    Stale,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Empty => "empty",
            Reason::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    cutoff: Cutoff,
}

impl EvictionPolicy {
    pub fn new(cutoff: Cutoff) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn is_stale(&self, entry: &EntryView) -> bool {
        self.cutoff.is_stale(entry.accessed)
    }

    /// `remaining` is the number of children still present after the
    /// directory's contents were processed.
    pub fn should_prune(&self, entry: &EntryView, remaining: usize) -> bool {
        entry.is_dir && remaining == 0
    }
}
