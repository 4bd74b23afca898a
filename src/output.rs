use colored::Colorize;

use tmpclean::report::{EventKind, RunReport};
use tmpclean::utils::{display_path, format_size, format_signed_size};

pub fn print_banner() {
    println!(
        "{}",
        concat!("tmpclean - Temporary Directory Cleaner v", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_report(report: &RunReport) {
    for event in &report.events {
        let path = display_path(&event.path);
        match &event.kind {
            EventKind::Removed { reason, bytes } => {
                print_removed("Deleted", &path, reason.as_str(), *bytes)
            }
            EventKind::WouldRemove { reason, bytes } => {
                print_removed("Would delete", &path, reason.as_str(), *bytes)
            }
            EventKind::RemoveFailed { error, .. } => print_failure(&path, error),
            EventKind::Unreadable { error } => print_failure(&path, error),
            EventKind::RootMissing => print_info(&format!("{path} does not exist, skipped")),
            EventKind::RootUnreadable { error } => {
                print_warning(&format!("cannot read {path}: {error}"))
            }
            EventKind::Foreign => {}
        }
    }
    println!();
    print_summary(report);
}

fn print_removed(verb: &str, path: &str, reason: &str, bytes: u64) {
    println!(
        "  {} {}  {}  {}",
        verb.red(),
        path.dimmed(),
        format_size(bytes).yellow(),
        format!("[{reason}]").dimmed()
    );
}

fn print_failure(path: &str, err: &str) {
    println!("  {} {}: {}", "Failed".red().bold(), path.dimmed(), err.red());
}

fn print_summary(report: &RunReport) {
    println!("{}", "=== Summary ===".bold().white());
    let removed_label = if report.dry_run { "Would remove:" } else { "Removed:" };
    print_summary_row(
        removed_label,
        &format!(
            "{} entries ({})",
            report.removed_count(),
            format_size(report.bytes_removed())
        ),
    );
    print_summary_row("Retained:", &report.retained.to_string());
    print_summary_row("Not owned:", &report.foreign_count().to_string());
    print_summary_row("Failed:", &report.failures().count().to_string());
    if let Some(freed) = report.space.freed() {
        print_summary_row("Disk space freed:", &format_signed_size(freed));
    }
    if let Some(available) = report.space.after {
        print_summary_row("Available:", &format_size(available));
    }
    println!();
    if report.dry_run {
        print_dry_run_footer();
    }
}

fn print_summary_row(label: &str, value: &str) {
    println!("  {:<30} {}", label, value.green());
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_info(msg: &str) {
    println!("{} {}", "Info:".cyan().bold(), msg);
}

fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Run without --dry-run to delete."
            .yellow()
            .bold()
    );
}
