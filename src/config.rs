//! Cleaner configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `TMPCLEAN_*` environment variables. Command line flags are applied last
//! by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cleaner::CleanupRequest;
use crate::error::{ConfigError, ConfigResult};
use crate::logging::LogConfig;
use crate::utils;

pub const ENV_DAYS: &str = "TMPCLEAN_DAYS";
pub const ENV_INTERVAL_MINUTES: &str = "TMPCLEAN_INTERVAL_MINUTES";
pub const ENV_EXTRA_DIRECTORIES: &str = "TMPCLEAN_EXTRA_DIRECTORIES";
pub const ENV_LOW_SPACE_THRESHOLD: &str = "TMPCLEAN_LOW_SPACE_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Remove entries not accessed for this many days.
    #[serde(default = "default_days")]
    pub days: u64,

    /// Recurrence period of scheduled runs.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Extra directories to clean, comma separated.
    #[serde(default)]
    pub extra_directories: Option<String>,

    /// Run out of schedule when free space on the temp filesystem drops
    /// below this size (e.g. "1GB").
    #[serde(default)]
    pub low_space_threshold: Option<String>,

    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_days() -> u64 {
    7
}

fn default_interval_minutes() -> u64 {
    360
}

fn default_poll_seconds() -> u64 {
    30
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            interval_minutes: default_interval_minutes(),
            extra_directories: None,
            low_space_threshold: None,
            poll_seconds: default_poll_seconds(),
            log: LogConfig::default(),
        }
    }
}

impl CleanerConfig {
    /// Defaults, overlaid with `path` if given, overlaid with the environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(days) = lookup(ENV_DAYS) {
            self.days = parse_number(ENV_DAYS, &days)?;
        }
        if let Some(minutes) = lookup(ENV_INTERVAL_MINUTES) {
            self.interval_minutes = parse_number(ENV_INTERVAL_MINUTES, &minutes)?;
        }
        if let Some(dirs) = lookup(ENV_EXTRA_DIRECTORIES) {
            self.extra_directories = Some(dirs);
        }
        if let Some(threshold) = lookup(ENV_LOW_SPACE_THRESHOLD) {
            self.low_space_threshold = Some(threshold);
        }
        Ok(self)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_seconds.max(1))
    }

    pub fn low_space_threshold_bytes(&self) -> ConfigResult<Option<u64>> {
        self.low_space_threshold
            .as_deref()
            .map(utils::parse_size)
            .transpose()
    }

    /// Extra directories as absolute paths, in configured order.
    pub fn extra_roots(&self) -> ConfigResult<Vec<PathBuf>> {
        match &self.extra_directories {
            Some(dirs) => split_directories(dirs)
                .into_iter()
                .map(|dir| {
                    std::path::absolute(&dir)
                        .map_err(|source| ConfigError::Resolve { path: dir, source })
                })
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    pub fn to_request(&self) -> ConfigResult<CleanupRequest> {
        Ok(CleanupRequest::new(self.days).with_extra_roots(self.extra_roots()?))
    }
}

/// Split a comma separated list, dropping empty entries.
pub fn split_directories(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn parse_number(key: &str, value: &str) -> ConfigResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_value(key, value))
}
