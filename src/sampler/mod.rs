//! Stack sampling seam: frame model and the StackSampler contract.
//!
//! The engine never reads a target process itself. A backend implementing
//! [`StackSampler`] delivers one stack observation per tick; everything
//! downstream (aggregation, ranking, rendering) is backend-agnostic.

pub mod replay;

pub use replay::ReplaySampler;

use crate::utils::error::AttachError;
use serde::{Deserialize, Serialize};

/// Opaque, stable identity of a callable unit in the target process.
///
/// **Public** - used as the aggregation key
///
/// The value is whatever handle the backend uses to tell functions apart
/// (an address, a code-object id). It must stay stable for the lifetime
/// of one session and must not be reused for a different function.
/// Ordering on the raw value is the documented tie-break when two
/// functions have equal hit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionId(pub u64);

/// One level of a captured call stack.
///
/// **Public** - produced by samplers, consumed by the aggregator
///
/// `source` and `lineno` are present only for user code; internal or
/// built-in functions carry neither. A missing `name` means the frame is
/// the entry point and is displayed as `main`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Identity of the function this frame is executing
    pub function: FunctionId,

    /// Enclosing scope name (class/module), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Function name; absent for the entry frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Source file, present only for user code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Line currently executing, present only for user code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
}

impl Frame {
    /// Whether this frame belongs to user code (has source information)
    pub fn is_user_code(&self) -> bool {
        self.source.is_some()
    }

    /// Resolve the display name: `Scope::Name`, `Name`, or `main`
    pub fn display_name(&self) -> String {
        let name = self.name.as_deref().unwrap_or("main");
        match &self.scope {
            Some(scope) => format!("{}::{}", scope, name),
            None => name.to_string(),
        }
    }
}

/// Result of asking the sampler for one tick's observation.
///
/// **Public** - returned by [`StackSampler::sample`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Frames ordered innermost (currently executing) first
    Stack(Vec<Frame>),

    /// No usable observation this tick (target momentarily unrunnable,
    /// stack unreadable). The tick is skipped, not an error.
    Miss,

    /// The target is gone; the session should end cleanly.
    Exited,
}

/// Contract a sampling backend must satisfy.
///
/// **Public** - the seam where live attach mechanisms plug in
pub trait StackSampler {
    /// Establish tracing. Called exactly once, before any `sample` call.
    fn attach(&mut self) -> Result<(), AttachError>;

    /// Capture up to `max_depth` frames, innermost first.
    fn sample(&mut self, max_depth: usize) -> SampleOutcome;

    /// Release the target. Safe to call even after `Exited`.
    fn detach(&mut self);

    /// Human-readable label for the target (pid, capture path)
    fn target(&self) -> String;
}

/// Deterministic in-memory sampler for tests and wiring checks.
///
/// **Public** - replays a fixed sequence of outcomes, then reports exit
pub struct ScriptedSampler {
    outcomes: std::vec::IntoIter<SampleOutcome>,
    attached: bool,
}

impl ScriptedSampler {
    pub fn new(outcomes: Vec<SampleOutcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter(),
            attached: false,
        }
    }
}

impl StackSampler for ScriptedSampler {
    fn attach(&mut self) -> Result<(), AttachError> {
        self.attached = true;
        Ok(())
    }

    fn sample(&mut self, max_depth: usize) -> SampleOutcome {
        if !self.attached {
            return SampleOutcome::Miss;
        }
        match self.outcomes.next() {
            Some(SampleOutcome::Stack(mut frames)) => {
                frames.truncate(max_depth);
                SampleOutcome::Stack(frames)
            }
            Some(other) => other,
            None => SampleOutcome::Exited,
        }
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn target(&self) -> String {
        "scripted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_frame(id: u64, name: &str, lineno: u32) -> Frame {
        Frame {
            function: FunctionId(id),
            scope: None,
            name: Some(name.to_string()),
            source: Some("a.php".to_string()),
            lineno: Some(lineno),
        }
    }

    #[test]
    fn test_display_name_with_scope() {
        let frame = Frame {
            function: FunctionId(1),
            scope: Some("Foo".to_string()),
            name: Some("bar".to_string()),
            source: None,
            lineno: None,
        };
        assert_eq!(frame.display_name(), "Foo::bar");
    }

    #[test]
    fn test_display_name_entry_frame() {
        let frame = Frame {
            function: FunctionId(1),
            scope: None,
            name: None,
            source: Some("a.php".to_string()),
            lineno: Some(1),
        };
        assert_eq!(frame.display_name(), "main");
    }

    #[test]
    fn test_user_code_means_has_source() {
        assert!(user_frame(1, "f", 10).is_user_code());

        let internal = Frame {
            function: FunctionId(2),
            scope: None,
            name: Some("strlen".to_string()),
            source: None,
            lineno: None,
        };
        assert!(!internal.is_user_code());
    }

    #[test]
    fn test_scripted_sampler_truncates_to_depth() {
        let frames = vec![
            user_frame(1, "inner", 5),
            user_frame(2, "mid", 9),
            user_frame(3, "outer", 20),
        ];
        let mut sampler = ScriptedSampler::new(vec![SampleOutcome::Stack(frames)]);
        sampler.attach().unwrap();

        match sampler.sample(1) {
            SampleOutcome::Stack(got) => {
                assert_eq!(got.len(), 1);
                assert_eq!(got[0].function, FunctionId(1));
            }
            other => panic!("expected stack, got {:?}", other),
        }
    }

    #[test]
    fn test_scripted_sampler_exits_when_drained() {
        let mut sampler = ScriptedSampler::new(vec![SampleOutcome::Miss]);
        sampler.attach().unwrap();
        assert_eq!(sampler.sample(1), SampleOutcome::Miss);
        assert_eq!(sampler.sample(1), SampleOutcome::Exited);
    }

    #[test]
    fn test_frame_serde_roundtrip_skips_absent_fields() {
        let internal = Frame {
            function: FunctionId(7),
            scope: None,
            name: Some("strlen".to_string()),
            source: None,
            lineno: None,
        };
        let json = serde_json::to_string(&internal).unwrap();
        assert!(!json.contains("source"));
        assert!(!json.contains("lineno"));

        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, internal);
    }
}
