use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a cleanup run.
///
/// Per-entry failures (unreadable metadata, failed removals) never surface
/// here; they are recorded in the [`RunReport`](crate::report::RunReport).
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Probing a configured extra directory failed for a reason other than
    /// the directory simply not existing.
    #[error("failed to enumerate extra directory {}: {source}", path.display())]
    ExtraRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while assembling a [`CleanerConfig`](crate::config::CleanerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("invalid size: {0}")]
    InvalidSize(String),

    #[error("cannot resolve directory {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid_value(key: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.into(),
        }
    }
}
