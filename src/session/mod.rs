//! Trace session lifecycle and the per-tick sample processor.
//!
//! One session owns the aggregation table and the display surface for
//! its whole life. The flow is `NotStarted -> Started -> Ended`: attach
//! acquires resources, each tick is synchronous run-to-completion
//! (sample, aggregate, render), teardown releases only what was
//! actually acquired.

pub mod scheduler;

pub use scheduler::Ticker;

use crate::aggregator::AggregationTable;
use crate::render::{draw_snapshot, Screen};
use crate::sampler::{SampleOutcome, StackSampler};
use crate::utils::config::{DEFAULT_DEPTH, DEFAULT_FREQUENCY_HZ};
use crate::utils::error::{RenderError, SessionError};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Session lifecycle states. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Started,
    Ended,
}

/// Values the session consumes; parsing them is the CLI's business.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sampling frequency in ticks per second
    pub frequency_hz: u32,

    /// Stack levels recorded per tick. 1 records only the innermost
    /// frame (a self-time-like profile); more credits callers with
    /// "was on the stack".
    pub depth: usize,

    /// Stop after this many recorded samples; None means unbounded
    pub max_samples: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            depth: DEFAULT_DEPTH,
            max_samples: None,
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frames were recorded and the view was redrawn
    Recorded,

    /// No usable observation; table and display untouched
    Skipped,

    /// The target is gone
    Exited,
}

/// Why the sampling loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetExited,
    Interrupted,
    SampleCapReached,
}

/// Summary returned after a clean session end.
#[derive(Debug, Clone, Copy)]
pub struct SessionSummary {
    /// Ticks delivered, including skipped ones
    pub ticks: u64,

    /// Ticks that recorded at least one frame
    pub samples: u64,

    pub stop: StopReason,
}

/// One trace session: aggregation table + display + lifecycle flags.
///
/// **Public** - constructed explicitly and passed around; no globals
pub struct Session<S: Screen> {
    config: SessionConfig,
    screen: S,
    table: AggregationTable,
    state: SessionState,
    ticks: u64,
    samples: u64,
}

impl<S: Screen> Session<S> {
    pub fn new(config: SessionConfig, screen: S) -> Self {
        Self {
            config,
            screen,
            table: AggregationTable::new(),
            state: SessionState::NotStarted,
            ticks: 0,
            samples: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn table(&self) -> &AggregationTable {
        &self.table
    }

    /// Consume the session and keep the aggregated data, e.g. to write
    /// a report after the live view is gone.
    pub fn into_table(self) -> AggregationTable {
        self.table
    }

    /// Attach and acquire the display.
    ///
    /// **Public** - `NotStarted -> Started`
    ///
    /// On any failure the session never enters `Started` and no teardown
    /// of unacquired resources is attempted: a failed attach leaves the
    /// screen untouched, a failed screen init detaches the sampler again.
    pub fn begin(&mut self, sampler: &mut dyn StackSampler) -> Result<(), SessionError> {
        debug_assert_eq!(self.state, SessionState::NotStarted);

        sampler.attach()?;

        if let Err(e) = self.screen.init() {
            sampler.detach();
            return Err(SessionError::Render(e));
        }

        info!("Attached to {}", sampler.target());
        self.state = SessionState::Started;
        Ok(())
    }

    /// Process one sampling tick: observe, aggregate, redraw.
    ///
    /// **Public** - the steady state, `Started -> Started`
    ///
    /// A miss or an empty observation is a skipped tick: no counter
    /// moves, nothing is drawn, no error is surfaced. Render failures
    /// are fatal and bubble up; the aggregated data stays intact.
    pub fn tick(&mut self, sampler: &mut dyn StackSampler) -> Result<TickOutcome, RenderError> {
        debug_assert_eq!(self.state, SessionState::Started);
        self.ticks += 1;

        let frames = match sampler.sample(self.config.depth) {
            SampleOutcome::Exited => return Ok(TickOutcome::Exited),
            SampleOutcome::Miss => return Ok(TickOutcome::Skipped),
            SampleOutcome::Stack(frames) if frames.is_empty() => {
                return Ok(TickOutcome::Skipped)
            }
            SampleOutcome::Stack(frames) => frames,
        };

        for frame in frames.iter().take(self.config.depth) {
            self.table.record_frame(frame);
        }
        self.samples += 1;

        draw_snapshot(&self.table, &mut self.screen)?;
        Ok(TickOutcome::Recorded)
    }

    /// Tear down. `-> Ended`, terminal, idempotent.
    ///
    /// The display is released only if the session ever started; a
    /// session aborted in `NotStarted` has nothing to release.
    pub fn end(&mut self, sampler: &mut dyn StackSampler) {
        if self.state == SessionState::Started {
            sampler.detach();
            if let Err(e) = self.screen.shutdown() {
                log::warn!("Display shutdown failed: {}", e);
            }
        }
        self.state = SessionState::Ended;
    }

    /// Drive a complete session: begin, tick until done, end.
    ///
    /// **Public** - main entry point used by the CLI
    ///
    /// Ticks are strictly sequential; the interrupt flag is only
    /// observed between ticks, so in-flight tick work always runs to
    /// completion first. Returns a summary on clean end; attach and
    /// render failures are terminal and tear down whatever was acquired.
    pub fn run(
        &mut self,
        sampler: &mut dyn StackSampler,
        interrupt: &Arc<AtomicBool>,
    ) -> Result<SessionSummary, SessionError> {
        self.begin(sampler)?;

        let mut ticker = Ticker::new(self.config.frequency_hz);
        let stop = loop {
            if interrupt.load(Ordering::Relaxed) {
                break StopReason::Interrupted;
            }
            if let Some(max) = self.config.max_samples {
                if self.samples >= max {
                    break StopReason::SampleCapReached;
                }
            }

            match self.tick(sampler) {
                Ok(TickOutcome::Exited) => break StopReason::TargetExited,
                Ok(_) => {}
                Err(e) => {
                    self.end(sampler);
                    return Err(SessionError::Render(e));
                }
            }

            ticker.wait();
        };

        self.end(sampler);

        let summary = SessionSummary {
            ticks: self.ticks,
            samples: self.samples,
            stop,
        };
        info!(
            "Session ended: {} ticks, {} samples recorded, {} functions seen",
            summary.ticks,
            summary.samples,
            self.table.len()
        );
        Ok(summary)
    }
}
