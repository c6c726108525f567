//! CLI entry point for binscout.
//!
//! Scans a repository checkout for binary files and drives `git lfs track`
//! so detected binary file types and extensionless binary paths become
//! tracked.
//!
//! # Usage
//!
//! ```bash
//! # Scan the current checkout recursively, print what was found
//! binscout --recursive
//!
//! # Honor .gitignore, track findings in LFS, print statistics
//! binscout -d /path/to/repo -r -i -t -s
//! ```
//!
//! One run starts three threads: the scanner (producer) and one dispatcher
//! per work queue (consumers). The main thread blocks until all three have
//! finished, then prints the sorted results and the run statistics.

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::sync::Arc;
use std::thread;

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::eyre;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bs_core::{QueueKind, RunOptions, ScanStats, StatsSnapshot, work_queue};
use bs_scanner::{FilterSet, ScanOutcome, Scanner};
use bs_track::{CommandRunner, GitTools, SystemRunner, TrackDispatcher};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Finds binary files in a repository checkout and tracks them in Git LFS.
///
/// Binary detection reads each candidate in 1024-byte blocks: a leading
/// byte-order mark means text, a NUL byte means binary.
#[derive(Parser)]
#[command(name = "binscout", version, about, long_about = None)]
struct Cli {
    /// Directory to scan (the repository checkout root).
    #[arg(short, long, default_value = ".")]
    directory: Utf8PathBuf,

    /// Skip files matched by the root's .gitignore.
    #[arg(short, long)]
    ignore_files: bool,

    /// Log the time spent scanning and tracking.
    #[arg(short, long)]
    measure: bool,

    /// Descend into subdirectories instead of scanning the root only.
    #[arg(short, long)]
    recursive: bool,

    /// Print run statistics.
    #[arg(short, long)]
    stats: bool,

    /// Track detected binary types and paths with git lfs.
    #[arg(short, long)]
    track: bool,

    /// Enable debug-level output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        RunOptions {
            directory: self.directory,
            ignore_files: self.ignore_files,
            measure: self.measure,
            recursive: self.recursive,
            stats: self.stats,
            track: self.track,
            verbose: self.verbose,
        }
    }
}

// =============================================================================
// INITIALIZATION
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise `--verbose`
/// selects debug level, info is the default. The `NO_COLOR` environment
/// variable disables ANSI colors.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let use_ansi = std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Runs the scan/track pipeline to completion.
///
/// Spawns the scanner and both dispatchers, joins all three, then reports.
fn run(options: RunOptions) -> color_eyre::Result<()> {
    info!(
        root = %options.directory,
        recursive = options.recursive,
        track = options.track,
        "starting run"
    );

    let stats = Arc::new(ScanStats::new());
    let filters = FilterSet::load(&options);
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
    let tools = Arc::new(GitTools::new(options.clone(), runner));

    let (extension_tx, extension_rx) = work_queue();
    let (path_tx, path_rx) = work_queue();

    let scanner = Scanner::new(
        options.clone(),
        filters,
        Arc::clone(&stats),
        extension_tx,
        path_tx,
    );
    let extension_dispatcher = TrackDispatcher::new(
        QueueKind::Extensions,
        options.clone(),
        Arc::clone(&tools),
        Arc::clone(&stats),
    );
    let path_dispatcher = TrackDispatcher::new(
        QueueKind::Paths,
        options.clone(),
        Arc::clone(&tools),
        Arc::clone(&stats),
    );

    let outcome = thread::scope(|scope| {
        let scan = scope.spawn(move || scanner.run());
        let extensions = scope.spawn(move || extension_dispatcher.run(extension_rx));
        let paths = scope.spawn(move || path_dispatcher.run(path_rx));

        let outcome = scan.join().map_err(|_| eyre!("scanner thread panicked"))?;
        extensions
            .join()
            .map_err(|_| eyre!("extension dispatcher thread panicked"))?;
        paths
            .join()
            .map_err(|_| eyre!("path dispatcher thread panicked"))?;
        Ok::<ScanOutcome, color_eyre::Report>(outcome)
    })?;

    print_results(&outcome);
    print_statistics(&stats.snapshot(), &outcome, options.stats);

    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Prints the sorted binary extension and path lists.
fn print_results(outcome: &ScanOutcome) {
    for extension in &outcome.extensions {
        info!("{extension}");
    }
    for path in &outcome.paths {
        info!("{path}");
    }
}

/// Prints the run statistics, at info level when `--stats` was given and at
/// debug level otherwise.
fn print_statistics(snapshot: &StatsSnapshot, outcome: &ScanOutcome, show: bool) {
    let lines = [
        format!(
            "directories: {} processed, {} total, {} access denied",
            snapshot.directories.processed,
            snapshot.directories.total,
            snapshot.directories.access_denied
        ),
        format!(
            "files: {} processed, {} total, {} access denied",
            snapshot.files.processed, snapshot.files.total, snapshot.files.access_denied
        ),
        format!("ignored files: {}", snapshot.ignored_files),
        format!(
            "binaries: {} types, {} files ({} tracked new, {} already supported)",
            outcome.extensions.len(),
            outcome.paths.len(),
            snapshot.tracked_files,
            snapshot.already_supported
        ),
    ];
    for line in lines {
        if show {
            info!("{line}");
        } else {
            debug!("{line}");
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.into_options();
    options.validate()?;

    run(options)
}
