//! Per-function and per-line hit counters.

use crate::sampler::{Frame, FunctionId};
use std::collections::HashMap;

/// Hit counter for one source line within a function.
///
/// **Public** - exposed through ranked snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStats {
    /// Line number, immutable key within the owning function
    pub lineno: u32,

    /// Observations of execution paused at this line
    pub hits: u64,
}

/// Aggregate statistics for one function identity.
///
/// The display name and source file are resolved exactly once, from the
/// first frame observed for this identity; later frames never change
/// them. Line-level counters exist only for user code.
#[derive(Debug, Clone)]
pub struct FunctionStats {
    /// Stable identity, the aggregation key
    pub id: FunctionId,

    /// `Scope::Name`, `Name`, or `main` - resolved at first observation
    pub display_name: String,

    /// Source file, present only for user code
    pub source: Option<String>,

    /// Total frame observations attributed to this function
    pub hits: u64,

    /// Per-line counters, keyed by line number; empty for internal code
    pub lines: HashMap<u32, LineStats>,
}

impl FunctionStats {
    /// Create stats for a newly observed identity.
    ///
    /// **Public** - called by the table on first observation only
    pub fn new(frame: &Frame) -> Self {
        Self {
            id: frame.function,
            display_name: frame.display_name(),
            source: frame.source.clone(),
            hits: 0,
            lines: HashMap::new(),
        }
    }

    /// Whether this function had source information when first observed
    pub fn is_user_code(&self) -> bool {
        self.source.is_some()
    }

    /// Line counters ranked by hits descending, ties by line ascending.
    ///
    /// **Public** - materialized fresh for each snapshot
    pub fn ranked_lines(&self) -> Vec<&LineStats> {
        let mut lines: Vec<&LineStats> = self.lines.values().collect();
        lines.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.lineno.cmp(&b.lineno)));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: u64) -> Frame {
        Frame {
            function: FunctionId(id),
            scope: Some("Account".to_string()),
            name: Some("balance".to_string()),
            source: Some("account.php".to_string()),
            lineno: Some(42),
        }
    }

    #[test]
    fn test_new_starts_at_zero_hits() {
        let stats = FunctionStats::new(&frame(1));
        assert_eq!(stats.hits, 0);
        assert!(stats.lines.is_empty());
        assert_eq!(stats.display_name, "Account::balance");
        assert!(stats.is_user_code());
    }

    #[test]
    fn test_ranked_lines_order_and_tie_break() {
        let mut stats = FunctionStats::new(&frame(1));
        stats.lines.insert(6, LineStats { lineno: 6, hits: 1 });
        stats.lines.insert(5, LineStats { lineno: 5, hits: 1 });
        stats.lines.insert(9, LineStats { lineno: 9, hits: 4 });

        let ranked = stats.ranked_lines();
        assert_eq!(ranked[0].lineno, 9);
        // Tied lines come out in ascending line order
        assert_eq!(ranked[1].lineno, 5);
        assert_eq!(ranked[2].lineno, 6);
    }
}
