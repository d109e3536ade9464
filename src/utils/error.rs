//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and
//! commands. Only attach and render failures are terminal for a session;
//! everything else is absorbed at the tick level.

use thiserror::Error;

/// Errors establishing tracing on a target
#[derive(Error, Debug)]
pub enum AttachError {
    #[error("target not found: {0}")]
    TargetNotFound(String),

    #[error("permission denied attaching to {0}")]
    PermissionDenied(String),

    #[error("cannot open capture {path}: {source}")]
    CaptureOpen {
        path: String,
        source: std::io::Error,
    },

    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),
}

/// Errors on the display surface. Fatal to the session: a broken
/// display cannot keep providing value, though the aggregated data
/// itself stays intact.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("display I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal session outcomes crossing the session boundary
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to attach: {0}")]
    Attach(#[from] AttachError),

    #[error("display failure: {0}")]
    Render(#[from] RenderError),
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
