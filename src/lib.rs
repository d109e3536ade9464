//! stacktop
//!
//! Live "top"-style sampling profiler: attach to a running target,
//! capture its active stack frame at a fixed frequency, and keep a
//! continuously refreshed ranking of the hottest functions and lines.
//!
//! This crate provides the core implementation for the
//! `stacktop` CLI tool. The mechanism that extracts raw frames from a
//! live process is deliberately behind the [`sampler::StackSampler`]
//! trait; the crate ships a capture-replay backend and the aggregation,
//! session and rendering machinery that every backend shares.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod render;
pub mod sampler;
pub mod session;
pub mod utils;
