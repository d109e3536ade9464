//! The top-level function-identity to statistics mapping.
//!
//! One table lives for one trace session. Recording never fails; the
//! ranking is a derived view recomputed on demand, not a structural
//! property of the map.

use crate::aggregator::stats::{FunctionStats, LineStats};
use crate::sampler::{Frame, FunctionId};
use log::debug;
use std::collections::HashMap;

/// Map from function identity to its aggregate statistics.
///
/// **Public** - owned by the session, mutated only from the tick handler
#[derive(Debug, Default)]
pub struct AggregationTable {
    entries: HashMap<FunctionId, FunctionStats>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame observation.
    ///
    /// **Public** - the only mutating entry point besides `reset`
    ///
    /// Creates the function entry on first sight (name and source are
    /// resolved from that first frame and never again), increments its
    /// hit counter, and for user-code frames also increments the counter
    /// of the line currently executing. Internal frames never get line
    /// entries, whatever their `lineno` field says.
    pub fn record_frame(&mut self, frame: &Frame) {
        let stats = self
            .entries
            .entry(frame.function)
            .or_insert_with(|| FunctionStats::new(frame));

        stats.hits += 1;

        if frame.is_user_code() {
            if let Some(lineno) = frame.lineno {
                let line = stats
                    .lines
                    .entry(lineno)
                    .or_insert(LineStats { lineno, hits: 0 });
                line.hits += 1;
            }
        }
    }

    /// Functions ranked by hits descending.
    ///
    /// **Public** - materializes the view drawn on every refresh
    ///
    /// Ties are broken by ascending [`FunctionId`] so that snapshots are
    /// reproducible; the line tables of each entry rank independently
    /// via [`FunctionStats::ranked_lines`].
    pub fn ranked(&self) -> Vec<&FunctionStats> {
        let mut ranked: Vec<&FunctionStats> = self.entries.values().collect();
        ranked.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.id.cmp(&b.id)));
        ranked
    }

    /// Destroy all entries. Used at session end or explicit reset.
    pub fn reset(&mut self) {
        debug!("Resetting aggregation table ({} entries)", self.entries.len());
        self.entries.clear();
    }

    /// Number of distinct functions observed so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of hit counters across all functions
    pub fn total_hits(&self) -> u64 {
        self.entries.values().map(|s| s.hits).sum()
    }

    /// Look up one function's stats by identity
    pub fn get(&self, id: FunctionId) -> Option<&FunctionStats> {
        self.entries.get(&id)
    }
}
