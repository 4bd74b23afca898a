//! Temporary directory cleaner.
//!
//! Walks the system temp directory (plus any configured extra directories)
//! depth-first and removes entries owned by the running user whose last
//! access is older than the retention window. Directories are pruned once
//! they are empty. Symlinks are never followed.
//!
//! The entry point is [`Cleaner::run_cleanup`]; [`run_cleanup`] is the same
//! operation wired to the local filesystem, clock and process identity.

pub mod cleaner;
pub mod config;
pub mod disk_info;
pub mod dispatch;
pub mod error;
pub mod eviction;
pub mod fs;
pub mod logging;
pub mod ownership;
pub mod report;
pub mod roots;
pub mod schedule;
pub mod utils;
pub mod walker;

#[cfg(test)]
mod testing;

pub use cleaner::{run_cleanup, Cleaner, CleanupRequest};
pub use config::CleanerConfig;
pub use error::{CleanupError, ConfigError};
pub use report::{CleanupEvent, EventKind, RunReport};
