mod cli;
mod output;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

use tmpclean::cleaner::{Cleaner, CleanupRequest};
use tmpclean::config::CleanerConfig;
use tmpclean::disk_info;
use tmpclean::dispatch::{Dispatcher, LocalNode};
use tmpclean::logging;
use tmpclean::schedule::{Scheduler, Trigger};

use cli::{CleanupArgs, Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config =
        CleanerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.log = config.log.clone().with_verbosity(cli.verbose);
    let _guard = logging::init_logging(&config.log).context("failed to initialize logging")?;

    match cli.command {
        Command::Run {
            cleanup,
            temp_dir,
            dry_run,
        } => {
            apply_cleanup_args(&mut config, cleanup);
            let mut request = config.to_request()?.with_dry_run(dry_run);
            if let Some(temp_dir) = temp_dir {
                request = request.with_temp_root(temp_dir);
            }
            run_once(&request)
        }
        Command::Daemon {
            cleanup,
            interval_minutes,
            low_space,
        } => {
            apply_cleanup_args(&mut config, cleanup);
            if let Some(minutes) = interval_minutes {
                config.interval_minutes = minutes;
            }
            if low_space.is_some() {
                config.low_space_threshold = low_space;
            }
            run_daemon(&config)
        }
    }
}

fn apply_cleanup_args(config: &mut CleanerConfig, args: CleanupArgs) {
    if let Some(days) = args.days {
        config.days = days;
    }
    if args.extra_dirs.is_some() {
        config.extra_directories = args.extra_dirs;
    }
}

fn run_once(request: &CleanupRequest) -> anyhow::Result<ExitCode> {
    output::print_banner();
    match Cleaner::local().run_cleanup(request) {
        Ok(report) => {
            output::print_report(&report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            output::print_warning(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_daemon(config: &CleanerConfig) -> anyhow::Result<ExitCode> {
    let request = config.to_request()?;
    let threshold = config.low_space_threshold_bytes()?;
    let dispatcher = Dispatcher::new(vec![Box::new(LocalNode::new())]);
    let mut scheduler = Scheduler::new(config.interval(), threshold);

    tracing::info!(
        interval_minutes = config.interval_minutes,
        low_space_threshold = ?threshold,
        days = config.days,
        nodes = dispatcher.node_count(),
        "Starting cleanup daemon"
    );

    loop {
        let available = disk_info::available_space(request.temp_root()).ok();
        if let Some(trigger) = scheduler.poll(Instant::now(), available) {
            match trigger {
                Trigger::Interval => tracing::info!("Scheduled cleanup"),
                Trigger::LowDiskSpace { available } => tracing::info!(
                    available = %tmpclean::utils::format_size(available),
                    "Low disk space, cleaning early"
                ),
            }
            dispatcher.spawn(request.clone());
        }
        std::thread::sleep(config.poll_interval());
    }
}
