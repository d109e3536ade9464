//! Output writers for session report data.
//!
//! The live view is ephemeral; this module persists the final
//! aggregation as a JSON report after a clean session end.

pub mod json;

// Re-export main functions
pub use json::{read_report, to_report, write_report, FunctionEntry, LineEntry, ProfileReport};
