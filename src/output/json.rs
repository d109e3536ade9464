//! JSON report writer.
//!
//! Serializes the final ranked aggregation to a JSON file with proper
//! formatting, so the data outlives the live terminal view.

use crate::aggregator::AggregationTable;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Persistent form of one session's aggregation
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Report schema version
    pub version: String,

    /// Label of the profiled target
    pub target: String,

    /// Ticks that recorded at least one frame
    pub total_samples: u64,

    /// Sum of all function hit counters (>= total_samples when depth > 1)
    pub total_hits: u64,

    /// Functions in ranked order, hottest first
    pub functions: Vec<FunctionEntry>,

    /// ISO 8601 timestamp
    pub generated_at: String,
}

/// One ranked function in the report
#[derive(Debug, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,

    /// Source file; None for internal/built-in functions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub hits: u64,

    /// Ranked line counters; empty for internal functions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<LineEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineEntry {
    pub lineno: u32,
    pub hits: u64,
}

/// Build a report from a finished session's table.
///
/// **Public** - called by the CLI after a clean session end
pub fn to_report(table: &AggregationTable, target: &str, total_samples: u64) -> ProfileReport {
    let functions = table
        .ranked()
        .into_iter()
        .map(|stats| FunctionEntry {
            name: stats.display_name.clone(),
            source: stats.source.clone(),
            hits: stats.hits,
            lines: stats
                .ranked_lines()
                .into_iter()
                .map(|line| LineEntry {
                    lineno: line.lineno,
                    hits: line.hits,
                })
                .collect(),
        })
        .collect();

    ProfileReport {
        version: SCHEMA_VERSION.to_string(),
        target: target.to_string(),
        total_samples,
        total_hits: table.total_hits(),
        functions,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &ProfileReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a report back from a JSON file
///
/// **Public** - used by `stacktop validate` and tests
pub fn read_report(input_path: impl AsRef<Path>) -> Result<ProfileReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: ProfileReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, target {}",
        report.version, report.target
    );

    Ok(report)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
