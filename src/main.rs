//! Check-Ratings main entry point
//!
//! Command-line interface for gathering store page ratings and reporting on them.

use anyhow::Context;
use check_ratings::config::{load_config_or_default, validate_max_workers, Config};
use check_ratings::gather::{limit_from_arg, run_gather};
use check_ratings::output::{
    print_statistics, rating_statistics, report_path, write_report, ReportFormat,
};
use check_ratings::storage::read_snapshot;
use check_ratings::{Rating, Report};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Check-Ratings: content ratings for a list of store apps
///
/// Gathers the store page of every app in a markdown link list into a
/// snapshot, then reports the apps grouped by content rating.
#[derive(Parser, Debug)]
#[command(name = "check-ratings")]
#[command(version = "1.0.0")]
#[command(about = "Content-rating report for a list of store apps", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every listed store page and write a snapshot
    Gather {
        /// Markdown file with one `* [Name](url)` line per app
        #[arg(short, long, value_name = "INPUT")]
        input: PathBuf,

        /// Snapshot file to write
        #[arg(short, long, value_name = "SNAPSHOT")]
        output: PathBuf,

        /// Read at most this many apps; zero or negative reads all
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of store pages fetched concurrently
        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Render a report from a snapshot
    Report {
        /// Snapshot file written by `gather`
        #[arg(short, long, value_name = "SNAPSHOT")]
        input: PathBuf,

        /// Report file to write; the format's extension is added when missing
        #[arg(short, long, value_name = "REPORT")]
        output: PathBuf,

        /// Ratings to leave out of the report
        #[arg(short = 'x', long = "ignore", value_name = "RATING", num_args = 1..)]
        ignore: Vec<Rating>,

        /// Report format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// Show per-rating statistics of a snapshot and exit
    Stats {
        /// Snapshot file written by `gather`
        #[arg(short, long, value_name = "SNAPSHOT")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to build default configuration".to_string(),
        }
    })?;
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from {}", path.display());
    }

    match cli.command {
        Command::Gather {
            input,
            output,
            limit,
            max_workers,
        } => handle_gather(config, &input, &output, limit, max_workers).await,
        Command::Report {
            input,
            output,
            ignore,
            format,
        } => handle_report(&config, &input, &output, ignore, format),
        Command::Stats { input } => handle_stats(&input),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("check_ratings=info,warn"),
            1 => EnvFilter::new("check_ratings=debug,info"),
            2 => EnvFilter::new("check_ratings=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn handle_gather(
    mut config: Config,
    input: &Path,
    output: &Path,
    limit: Option<i64>,
    max_workers: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(workers) = max_workers {
        validate_max_workers(workers).context("Invalid --max-workers")?;
        config.gather.max_workers = workers;
    }

    let gathered = run_gather(&config, input, output, limit_from_arg(limit))
        .await
        .with_context(|| format!("Gather from {} failed", input.display()))?;

    if !gathered.failures.is_empty() {
        tracing::warn!(
            "{} apps could not be fetched and were left out of the snapshot",
            gathered.failures.len()
        );
    }
    Ok(())
}

fn handle_report(
    config: &Config,
    input: &Path,
    output: &Path,
    ignore: Vec<Rating>,
    format: Option<ReportFormat>,
) -> anyhow::Result<()> {
    // Command-line ratings replace the configured list
    let ignore: HashSet<Rating> = if ignore.is_empty() {
        config.report.ignore_set()
    } else {
        ignore.into_iter().collect()
    };
    tracing::debug!("ignored_ratings={:?}", ignore);

    let snapshot = read_snapshot(input)
        .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
    let report = Report::from_snapshot(&config.report.title, snapshot, &ignore);

    let renderer = format.unwrap_or(config.report.format).renderer();
    let output = report_path(output, renderer.as_ref());
    write_report(&report, renderer.as_ref(), &output)
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    tracing::info!("Report written to {}", output.display());
    Ok(())
}

fn handle_stats(input: &Path) -> anyhow::Result<()> {
    let snapshot = read_snapshot(input)
        .with_context(|| format!("Failed to read snapshot {}", input.display()))?;

    println!("Snapshot: {}", input.display());
    println!("Gathered: {}", snapshot.meta.created_at);
    println!("Input hash: {}\n", snapshot.meta.source_hash);
    print_statistics(&rating_statistics(&snapshot.records));
    Ok(())
}
