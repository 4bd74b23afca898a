use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tmpclean",
    about = "Remove stale temporary files owned by the current user",
    version
)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command.
#[derive(Args, Default)]
pub struct CleanupArgs {
    /// Remove entries not accessed for this many days
    #[arg(long)]
    pub days: Option<u64>,

    /// Extra directories to clean, comma separated
    #[arg(long)]
    pub extra_dirs: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean once and print a summary
    Run {
        #[command(flatten)]
        cleanup: CleanupArgs,

        /// Clean this directory instead of the system temp directory
        #[arg(long)]
        temp_dir: Option<PathBuf>,

        /// Report what would be removed without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Clean periodically, and whenever free space runs low
    Daemon {
        #[command(flatten)]
        cleanup: CleanupArgs,

        /// Minutes between scheduled runs
        #[arg(long)]
        interval_minutes: Option<u64>,

        /// Run early when free space drops below this size (e.g. "1GB")
        #[arg(long)]
        low_space: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "tmpclean",
            "-vv",
            "run",
            "--days",
            "3",
            "--extra-dirs",
            "/a,/b",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Run {
                cleanup, dry_run, ..
            } => {
                assert_eq!(cleanup.days, Some(3));
                assert_eq!(cleanup.extra_dirs.as_deref(), Some("/a,/b"));
                assert!(dry_run);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_daemon() {
        let cli = Cli::parse_from(["tmpclean", "daemon", "--low-space", "1GB"]);
        match cli.command {
            Command::Daemon {
                low_space,
                interval_minutes,
                ..
            } => {
                assert_eq!(low_space.as_deref(), Some("1GB"));
                assert_eq!(interval_minutes, None);
            }
            _ => panic!("expected daemon"),
        }
    }
}
