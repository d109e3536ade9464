//! stacktop CLI
//!
//! A live top-style sampling profiler. Replays stack captures through
//! the sampling engine and keeps a continuously refreshed ranking of
//! the hottest functions and lines.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use stacktop::commands::{execute_replay, validate_args, ReplayArgs};
use stacktop::utils::config::{DEFAULT_DEPTH, DEFAULT_FREQUENCY_HZ, SCHEMA_VERSION};

/// stacktop - live sampling profiler for running processes
#[derive(Parser, Debug)]
#[command(name = "stacktop")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trace session over a stack capture file
    Replay {
        /// Path to the JSON-lines capture file
        #[arg(short, long)]
        capture: PathBuf,

        /// Sampling frequency in ticks per second
        #[arg(long, default_value_t = DEFAULT_FREQUENCY_HZ)]
        freq: u32,

        /// Stack levels to record per tick (1 = innermost frame only)
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// Stop after this many recorded samples
        #[arg(long)]
        max: Option<u64>,

        /// Write the final aggregation to this JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print snapshots to stdout instead of the live terminal view
        #[arg(long)]
        plain: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Replay {
            capture,
            freq,
            depth,
            max,
            output,
            plain,
        } => {
            let args = ReplayArgs {
                capture,
                frequency_hz: freq,
                depth,
                max_samples: max,
                output,
                plain,
            };

            // Validate args first
            validate_args(&args)?;

            execute_replay(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a report JSON file
///
/// **Private** - internal command implementation
fn validate_report_file(file_path: PathBuf) -> Result<()> {
    use stacktop::output::read_report;

    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Target: {}", report.target);
    println!("  Total Samples: {}", report.total_samples);
    println!("  Total Hits: {}", report.total_hits);
    println!("  Functions: {}", report.functions.len());

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("stacktop v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("A live top-style sampling profiler for running processes.");
}
