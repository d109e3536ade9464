//! Aggregation of stack samples into ranked hit statistics.
//!
//! This module maintains the mutable statistical model behind the live
//! view: per-function hit counters, per-line hit counters for user code,
//! and the descending-by-hits ranking recomputed for every snapshot.

pub mod stats;
pub mod table;

// Re-export main types
pub use stats::{FunctionStats, LineStats};
pub use table::AggregationTable;
