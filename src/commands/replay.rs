//! Replay command implementation.
//!
//! The replay command:
//! 1. Opens a stack capture file as the sampling backend
//! 2. Runs a live session over it (attach, tick loop, teardown)
//! 3. Optionally writes the final aggregation as a JSON report
//!
//! Interactive runs draw on the alternate screen and stop on `q` or
//! Ctrl+C; `--plain` prints successive snapshots to stdout instead.

use crate::output::{to_report, write_report};
use crate::render::{PlainScreen, Screen, TerminalScreen};
use crate::sampler::{ReplaySampler, StackSampler};
use crate::session::{Session, SessionConfig, SessionSummary, StopReason};
use crate::utils::config::{MAX_DEPTH, MAX_FREQUENCY_HZ};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Arguments for the replay command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReplayArgs {
    /// Path to the JSON-lines capture file
    pub capture: PathBuf,

    /// Sampling frequency in ticks per second
    pub frequency_hz: u32,

    /// Stack levels to record per tick
    pub depth: usize,

    /// Stop after this many recorded samples
    pub max_samples: Option<u64>,

    /// Write the final aggregation to this JSON file
    pub output: Option<PathBuf>,

    /// Print snapshots to stdout instead of the live terminal view
    pub plain: bool,
}

/// Validate replay arguments
///
/// **Public** - can be called before execute_replay for early validation
pub fn validate_args(args: &ReplayArgs) -> Result<()> {
    if args.frequency_hz == 0 {
        anyhow::bail!("frequency must be greater than 0");
    }

    if args.frequency_hz > MAX_FREQUENCY_HZ {
        anyhow::bail!("frequency is too high (max {})", MAX_FREQUENCY_HZ);
    }

    if args.depth == 0 {
        anyhow::bail!("depth must be at least 1");
    }

    if args.depth > MAX_DEPTH {
        anyhow::bail!("depth is too large (max {})", MAX_DEPTH);
    }

    Ok(())
}

/// Execute the replay command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Ok on clean session end; Err on attach failure, render failure or
/// report write failure (all map to a non-zero process exit).
pub fn execute_replay(args: ReplayArgs) -> Result<()> {
    info!("Replaying capture: {}", args.capture.display());

    let mut sampler = ReplaySampler::new(&args.capture);
    let target = sampler.target();

    let config = SessionConfig {
        frequency_hz: args.frequency_hz,
        depth: args.depth,
        max_samples: args.max_samples,
    };

    let interrupt = Arc::new(AtomicBool::new(false));

    let (summary, table) = if args.plain {
        let session = Session::new(config, PlainScreen::new());
        run_session(session, &mut sampler, &interrupt)?
    } else {
        spawn_key_listener(Arc::clone(&interrupt));
        let session = Session::new(config, TerminalScreen::new());
        run_session(session, &mut sampler, &interrupt)?
    };

    print_summary(&summary, table.len());

    if let Some(output) = &args.output {
        let report = to_report(&table, &target, summary.samples);
        write_report(&report, output).context("Failed to write report JSON")?;
        println!("Report written to: {}", output.display());
    }

    Ok(())
}

/// Run a session to completion and keep its aggregation.
///
/// **Private** - shared between the screen variants
fn run_session<S: Screen>(
    mut session: Session<S>,
    sampler: &mut dyn StackSampler,
    interrupt: &Arc<AtomicBool>,
) -> Result<(SessionSummary, crate::aggregator::AggregationTable)> {
    let summary = session
        .run(sampler, interrupt)
        .context("Trace session failed")?;
    Ok((summary, session.into_table()))
}

/// Watch for `q` / Ctrl+C and raise the interrupt flag.
///
/// **Private** - the flag is only ever read between ticks, so the
/// listener can run on its own thread without touching session state.
fn spawn_key_listener(interrupt: Arc<AtomicBool>) {
    thread::spawn(move || loop {
        if interrupt.load(Ordering::Relaxed) {
            break;
        }
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {
                if let Ok(Event::Key(key)) = event::read() {
                    let ctrl_c = key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if key.code == KeyCode::Char('q') || ctrl_c {
                        debug!("Interrupt requested from keyboard");
                        interrupt.store(true, Ordering::Relaxed);
                        break;
                    }
                }
            }
            Ok(false) => {}
            Err(_) => break,
        }
    });
}

/// Print the end-of-session summary to stdout
///
/// **Private** - runs after the live view is torn down
fn print_summary(summary: &SessionSummary, functions_seen: usize) {
    let reason = match summary.stop {
        StopReason::TargetExited => "target exited",
        StopReason::Interrupted => "interrupted",
        StopReason::SampleCapReached => "sample cap reached",
    };
    println!(
        "Session ended ({}): {} ticks, {} samples, {} functions",
        reason, summary.ticks, summary.samples, functions_seen
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_args() -> ReplayArgs {
        ReplayArgs {
            capture: PathBuf::from("capture.jsonl"),
            frequency_hz: 1000,
            depth: 1,
            max_samples: None,
            output: None,
            plain: true,
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&valid_args()).is_ok());
    }

    #[test]
    fn test_validate_args_zero_frequency() {
        let args = ReplayArgs {
            frequency_hz: 0,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_frequency_too_high() {
        let args = ReplayArgs {
            frequency_hz: MAX_FREQUENCY_HZ + 1,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_depth() {
        let args = ReplayArgs {
            depth: 0,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_depth_too_large() {
        let args = ReplayArgs {
            depth: MAX_DEPTH + 1,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_replay_missing_capture_fails() {
        let args = ReplayArgs {
            capture: PathBuf::from("/nonexistent/capture.jsonl"),
            ..valid_args()
        };
        assert!(execute_replay(args).is_err());
    }
}
