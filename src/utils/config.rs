//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default sampling frequency (ticks per second)
pub const DEFAULT_FREQUENCY_HZ: u32 = 1000;

/// Upper bound on sampling frequency accepted from the CLI
pub const MAX_FREQUENCY_HZ: u32 = 100_000;

/// Default stack depth recorded per tick: innermost frame only,
/// yielding a self-time-like profile
pub const DEFAULT_DEPTH: usize = 1;

/// Upper bound on recorded stack depth accepted from the CLI
pub const MAX_DEPTH: usize = 256;
