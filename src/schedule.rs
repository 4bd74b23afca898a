use std::time::{Duration, Instant};

/// Why a run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Interval,
    LowDiskSpace { available: u64 },
}

/// Decides when to run: every `interval`, and once each time free space
/// drops below the threshold.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    low_space_threshold: Option<u64>,
    last_run: Option<Instant>,
    /// Set while free space is below the threshold, so one low-space episode
    /// triggers a single run.
    low_space: bool,
}

impl Scheduler {
    pub fn new(interval: Duration, low_space_threshold: Option<u64>) -> Self {
        Self {
            interval,
            low_space_threshold,
            last_run: None,
            low_space: false,
        }
    }

    /// `available` is the current free space, if it could be measured.
    pub fn poll(&mut self, now: Instant, available: Option<u64>) -> Option<Trigger> {
        let trigger = self
            .check_low_space(available)
            .or_else(|| self.check_interval(now));
        if trigger.is_some() {
            self.last_run = Some(now);
        }
        trigger
    }

    fn check_low_space(&mut self, available: Option<u64>) -> Option<Trigger> {
        let (threshold, available) = match (self.low_space_threshold, available) {
            (Some(threshold), Some(available)) => (threshold, available),
            _ => return None,
        };
        if available >= threshold {
            self.low_space = false;
            return None;
        }
        if self.low_space {
            return None;
        }
        self.low_space = true;
        Some(Trigger::LowDiskSpace { available })
    }

    fn check_interval(&self, now: Instant) -> Option<Trigger> {
        match self.last_run {
            None => Some(Trigger::Interval),
            Some(last) if now.saturating_duration_since(last) >= self.interval => {
                Some(Trigger::Interval)
            }
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_first_poll_runs() {
        let mut scheduler = Scheduler::new(HOUR, None);
        assert_eq!(scheduler.poll(Instant::now(), None), Some(Trigger::Interval));
    }

    #[test]
    fn test_interval_elapsed() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(HOUR, None);
        scheduler.poll(start, None);

        assert_eq!(scheduler.poll(start + HOUR / 2, None), None);
        assert_eq!(scheduler.poll(start + HOUR, None), Some(Trigger::Interval));
        assert_eq!(scheduler.poll(start + HOUR + HOUR / 2, None), None);
    }

    #[test]
    fn test_low_space_fires_once_per_episode() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(HOUR, Some(1_000));
        scheduler.poll(start, Some(5_000));

        let t = start + Duration::from_secs(30);
        assert_eq!(
            scheduler.poll(t, Some(500)),
            Some(Trigger::LowDiskSpace { available: 500 })
        );
        assert_eq!(scheduler.poll(t + Duration::from_secs(30), Some(400)), None);

        // recovers, then drops again
        assert_eq!(scheduler.poll(t + Duration::from_secs(60), Some(2_000)), None);
        assert_eq!(
            scheduler.poll(t + Duration::from_secs(90), Some(900)),
            Some(Trigger::LowDiskSpace { available: 900 })
        );
    }

    #[test]
    fn test_low_space_run_resets_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(HOUR, Some(1_000));
        scheduler.poll(start, Some(5_000));
        scheduler.poll(start + HOUR / 2, Some(10));

        assert_eq!(scheduler.poll(start + HOUR, Some(10)), None);
        assert_eq!(
            scheduler.poll(start + HOUR + HOUR / 2, Some(10)),
            Some(Trigger::Interval)
        );
    }

    #[test]
    fn test_unknown_space_never_triggers_low_space() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(HOUR, Some(1_000));
        scheduler.poll(start, None);
        assert_eq!(scheduler.poll(start + Duration::from_secs(1), None), None);
    }
}
