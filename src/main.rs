//! filesweep - inventory a directory tree for cleanup.
//!
//! Usage:
//!   filesweep --directory-path DIR --output-file-path FILE [OPTIONS]
//!   filesweep --help
//!
//! Every regular file under DIR becomes one row of FILE, flagged as active
//! (accessed recently), unwanted (by extension) and, for active `.xlsx`
//! workbooks, whether any worksheet carries a hyperlink.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use filesweep_core::ScanConfig;
use filesweep_inspect::{TimeoutInspector, XlsxLinkInspector};
use filesweep_report::{Deduplicator, ExportFormat, Exporter, ScanSummary};
use filesweep_scan::{ScanProgress, Scanner};

#[derive(Parser)]
#[command(
    name = "filesweep",
    version,
    about = "Inventory a directory tree and flag files for cleanup",
    long_about = "filesweep walks a directory tree with a fixed number of workers and \
                  writes one row per file: size, owner, last access time, and whether \
                  the file is active, has an unwanted extension, or is a spreadsheet \
                  containing hyperlinks."
)]
struct Cli {
    /// Root directory to scan
    #[arg(long)]
    directory_path: PathBuf,

    /// Destination file (overwritten; its directory must exist)
    #[arg(long)]
    output_file_path: PathBuf,

    /// Files accessed within this many 30-day months are active
    #[arg(long, default_value_t = 12)]
    expiration_months: u32,

    /// Comma-separated extensions flagged as unwanted
    #[arg(long, value_delimiter = ',', default_value = ".tmp,.log,.bak")]
    unwanted_extensions: Vec<String>,

    /// Number of files processed at once
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Seconds allowed for inspecting a single spreadsheet. An abandoned
    /// inspection keeps running in the background and counts against
    /// --concurrency until it finishes; spreadsheets that find no free slot
    /// are reported without links
    #[arg(long, default_value_t = 30)]
    link_timeout: u64,

    /// Abort the scan after this many seconds
    #[arg(long)]
    deadline: Option<u64>,

    /// Output format
    #[arg(long, default_value = "csv")]
    format: OutputFormat,

    /// Skip hidden files and directories
    #[arg(long)]
    exclude_hidden: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = color_eyre::install() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Scan, deduplicate, export and report.
fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let config = ScanConfig::builder()
        .root(cli.directory_path.clone())
        .expiration_months(cli.expiration_months)
        .unwanted_extensions(parse_extensions(&cli.unwanted_extensions))
        .concurrency(cli.concurrency)
        .link_timeout(Duration::from_secs(cli.link_timeout))
        .deadline(cli.deadline.map(Duration::from_secs))
        .include_hidden(!cli.exclude_hidden)
        .build()
        .context("Invalid configuration")?;
    debug!(?config, "configuration");

    let inspector = TimeoutInspector::new(XlsxLinkInspector::new(), config.link_timeout)
        .with_max_in_flight(config.concurrency);
    let scanner = Scanner::new(inspector);
    let progress = spawn_progress_logger(scanner.subscribe());

    let outcome = scanner.scan(&config);
    // Closing the channel ends the progress thread.
    drop(scanner);
    let _ = progress.join();
    let outcome = outcome.context("Scan failed")?;

    if outcome.has_warnings() {
        warn!(
            warnings = outcome.warnings.len(),
            dropped = outcome.dropped_files().count(),
            "scan finished with warnings"
        );
    }

    let files_dropped = outcome.stats.files_dropped;
    let enumeration_errors = outcome.stats.enumeration_errors;
    let total_bytes = outcome.stats.total_bytes;

    let deduped = Deduplicator::new().dedup(outcome.records);
    if deduped.has_duplicates() {
        info!(removed = deduped.removed, "collapsed duplicate records");
    }
    let summary = ScanSummary::from_records(&deduped.records, deduped.removed);

    Exporter::new(cli.format.into())
        .write(&deduped.records, &cli.output_file_path)
        .with_context(|| format!("Cannot write {}", cli.output_file_path.display()))?;

    let location = display_path(&cli.output_file_path);
    println!("Wrote {} rows to {}", summary.rows, location.display());
    println!(
        " {} active, {} inactive, {} unwanted, {} with links",
        summary.active,
        summary.inactive(),
        summary.unwanted,
        summary.with_links
    );
    println!(
        " {} duplicates removed, {} files skipped, {} unreadable directories",
        summary.duplicates_removed, files_dropped, enumeration_errors
    );
    println!(
        " {} scanned in {:.2}s",
        format_size(total_bytes),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Trimmed extensions with blank entries dropped.
fn parse_extensions(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|ext| ext.trim())
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

/// Log progress snapshots until every file is processed or the scanner
/// goes away.
fn spawn_progress_logger(mut rx: broadcast::Receiver<ScanProgress>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match rx.blocking_recv() {
                Ok(progress) => {
                    info!(
                        processed = progress.files_processed,
                        total = progress.files_total,
                        percent = (progress.fraction_done() * 100.0).round() as u64,
                        dropped = progress.files_dropped,
                        files_per_second = progress.files_per_second() as u64,
                        "progress"
                    );
                    if progress.is_complete() {
                        break;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Absolute form of the output path when it can be resolved.
fn display_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
