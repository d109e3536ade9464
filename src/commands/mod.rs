//! Command implementations for the CLI.

pub mod replay;

// Re-export for main.rs
pub use replay::{execute_replay, validate_args, ReplayArgs};
