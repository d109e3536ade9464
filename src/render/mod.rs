//! Rendering of ranked snapshots onto a display surface.
//!
//! Each refresh replaces the whole surface: clear, write the formatted
//! ranking, flush. No diffing - at human refresh perception the full
//! redraw is plenty.

pub mod screen;

pub use screen::{BufferScreen, PlainScreen, Screen, TerminalScreen};

use crate::aggregator::AggregationTable;
use crate::utils::error::RenderError;

/// Format one ranked snapshot as the top-style text view.
///
/// **Public** - deterministic, side-effect free; the tests pin its shape
///
/// Per ranked function: a header (`Scope::Name`, `Name`, or `main`),
/// then for user code `" in <file> hits: <n>"` followed by one indented
/// row per ranked line, or `" <internal> hits: <n>"` for internal code.
pub fn format_snapshot(table: &AggregationTable) -> String {
    let mut out = String::new();

    for stats in table.ranked() {
        out.push_str(&stats.display_name);

        match &stats.source {
            Some(source) => {
                out.push_str(&format!(" in {} hits: {}\n", source, stats.hits));
                for line in stats.ranked_lines() {
                    out.push_str(&format!("\tline {} hits: {}\n", line.lineno, line.hits));
                }
            }
            None => {
                out.push_str(&format!(" <internal> hits: {}\n", stats.hits));
            }
        }
    }

    out
}

/// Draw one snapshot: clear the surface, write the ranking, flush.
///
/// **Public** - called by the session after every recorded tick
pub fn draw_snapshot(table: &AggregationTable, screen: &mut dyn Screen) -> Result<(), RenderError> {
    screen.clear()?;
    screen.write(&format_snapshot(table))?;
    screen.refresh()
}
