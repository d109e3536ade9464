//! Capture-replay sampling backend.
//!
//! Replays stack observations from a JSON-lines capture file, one record
//! per tick. This keeps the engine runnable end-to-end (and testable
//! deterministically) without any live attach mechanism:
//!
//! ```text
//! {"frames":[{"function":1,"name":"main","source":"a.php","lineno":10}]}
//! null
//! {"frames":[{"function":2,"name":"strlen"}]}
//! ```
//!
//! A `null` record is a missed tick; end of file means the target exited.

use crate::sampler::{Frame, SampleOutcome, StackSampler};
use crate::utils::error::AttachError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// One tick's worth of captured frames, innermost first
#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub frames: Vec<Frame>,
}

/// Sampler that replays observations from a capture file.
///
/// **Public** - backend used by the `replay` command and tests
pub struct ReplaySampler {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
}

impl ReplaySampler {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lines: None,
        }
    }
}

impl StackSampler for ReplaySampler {
    fn attach(&mut self) -> Result<(), AttachError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                AttachError::TargetNotFound(self.path.display().to_string())
            }
            std::io::ErrorKind::PermissionDenied => {
                AttachError::PermissionDenied(self.path.display().to_string())
            }
            _ => AttachError::CaptureOpen {
                path: self.path.display().to_string(),
                source: e,
            },
        })?;

        debug!("Replaying capture: {}", self.path.display());
        self.lines = Some(BufReader::new(file).lines());
        Ok(())
    }

    fn sample(&mut self, max_depth: usize) -> SampleOutcome {
        let lines = match self.lines.as_mut() {
            Some(lines) => lines,
            None => {
                warn!("sample() before attach(); treating as missed tick");
                return SampleOutcome::Miss;
            }
        };

        loop {
            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    warn!("Capture read error, skipping tick: {}", e);
                    return SampleOutcome::Miss;
                }
                None => return SampleOutcome::Exited,
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                // Blank lines are tolerated, not counted as ticks
                continue;
            }
            if trimmed == "null" {
                return SampleOutcome::Miss;
            }

            return match serde_json::from_str::<CaptureRecord>(trimmed) {
                Ok(mut record) => {
                    record.frames.truncate(max_depth);
                    SampleOutcome::Stack(record.frames)
                }
                Err(e) => {
                    warn!("Malformed capture record, skipping tick: {}", e);
                    SampleOutcome::Miss
                }
            };
        }
    }

    fn detach(&mut self) {
        self.lines = None;
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::FunctionId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn capture_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_attach_missing_file_is_target_not_found() {
        let mut sampler = ReplaySampler::new("/nonexistent/capture.jsonl");
        match sampler.attach() {
            Err(AttachError::TargetNotFound(_)) => {}
            other => panic!("expected TargetNotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_replay_sequence() {
        let file = capture_with(concat!(
            "{\"frames\":[{\"function\":1,\"name\":\"main\",\"source\":\"a.php\",\"lineno\":10}]}\n",
            "null\n",
            "{\"frames\":[{\"function\":2,\"name\":\"strlen\"}]}\n",
        ));
        let mut sampler = ReplaySampler::new(file.path());
        sampler.attach().unwrap();

        match sampler.sample(1) {
            SampleOutcome::Stack(frames) => {
                assert_eq!(frames.len(), 1);
                assert_eq!(frames[0].function, FunctionId(1));
                assert_eq!(frames[0].lineno, Some(10));
            }
            other => panic!("expected stack, got {:?}", other),
        }

        assert_eq!(sampler.sample(1), SampleOutcome::Miss);

        match sampler.sample(1) {
            SampleOutcome::Stack(frames) => {
                assert!(!frames[0].is_user_code());
            }
            other => panic!("expected stack, got {:?}", other),
        }

        assert_eq!(sampler.sample(1), SampleOutcome::Exited);
        assert_eq!(sampler.sample(1), SampleOutcome::Exited);
    }

    #[test]
    fn test_malformed_record_becomes_miss() {
        let file = capture_with("{not json}\n");
        let mut sampler = ReplaySampler::new(file.path());
        sampler.attach().unwrap();
        assert_eq!(sampler.sample(1), SampleOutcome::Miss);
    }

    #[test]
    fn test_depth_truncation() {
        let file = capture_with(
            "{\"frames\":[{\"function\":1,\"name\":\"a\"},{\"function\":2,\"name\":\"b\"},{\"function\":3,\"name\":\"c\"}]}\n",
        );
        let mut sampler = ReplaySampler::new(file.path());
        sampler.attach().unwrap();

        match sampler.sample(2) {
            SampleOutcome::Stack(frames) => {
                assert_eq!(frames.len(), 2);
                assert_eq!(frames[1].function, FunctionId(2));
            }
            other => panic!("expected stack, got {:?}", other),
        }
    }
}
