//! Display surfaces the renderer draws onto.
//!
//! The session acquires a screen on begin and releases it on end; the
//! renderer only ever clears, writes and refreshes. Three surfaces are
//! provided: a crossterm-backed terminal (alternate screen, raw mode),
//! a plain stdout writer for non-interactive runs, and an in-memory
//! buffer for tests.

use crate::utils::error::RenderError;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{stdout, Write};

/// Display surface contract.
///
/// **Public** - the session holds exactly one for its lifetime
///
/// `init` is called once on session start, `shutdown` once on session
/// end (and only if `init` succeeded). Between the two, every refresh is
/// a `clear` / `write` / `refresh` cycle replacing the previous frame.
pub trait Screen {
    fn init(&mut self) -> Result<(), RenderError>;
    fn clear(&mut self) -> Result<(), RenderError>;
    fn write(&mut self, text: &str) -> Result<(), RenderError>;
    fn refresh(&mut self) -> Result<(), RenderError>;
    fn shutdown(&mut self) -> Result<(), RenderError>;
}

/// Interactive terminal surface backed by crossterm.
///
/// Uses the alternate screen so the user's shell scrollback survives the
/// session. Raw mode is enabled so a key listener can see `q`/Ctrl+C
/// without a newline; written text therefore normalizes `\n` to `\r\n`.
#[derive(Default)]
pub struct TerminalScreen {
    active: bool,
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen for TerminalScreen {
    fn init(&mut self) -> Result<(), RenderError> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;
        self.active = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        queue!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), RenderError> {
        // Raw mode: line feeds alone do not return the cursor
        let normalized = text.replace('\n', "\r\n");
        queue!(stdout(), Print(normalized))?;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        stdout().flush()?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), RenderError> {
        if self.active {
            execute!(stdout(), Show, LeaveAlternateScreen)?;
            disable_raw_mode()?;
            self.active = false;
        }
        Ok(())
    }
}

/// Plain stdout surface for non-interactive runs (piped output, CI).
///
/// Snapshots are printed sequentially, separated by a rule, instead of
/// redrawing in place.
#[derive(Default)]
pub struct PlainScreen {
    pending: String,
}

impl PlainScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen for PlainScreen {
    fn init(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.pending.clear();
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), RenderError> {
        self.pending.push_str(text);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        let mut out = stdout();
        out.write_all(self.pending.as_bytes())?;
        out.write_all(b"----\n")?;
        out.flush()?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// In-memory surface capturing every refreshed frame.
///
/// **Public** - test double for renderer and session tests
#[derive(Default)]
pub struct BufferScreen {
    pending: String,
    frames: Vec<String>,
    initialized: bool,
    shut_down: bool,
    fail_refresh: bool,
}

impl BufferScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent refresh fail, to exercise fatal-render paths
    pub fn failing_on_refresh() -> Self {
        Self {
            fail_refresh: true,
            ..Self::default()
        }
    }

    /// All frames refreshed so far, oldest first
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn was_initialized(&self) -> bool {
        self.initialized
    }

    pub fn was_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Screen for BufferScreen {
    fn init(&mut self) -> Result<(), RenderError> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.pending.clear();
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), RenderError> {
        self.pending.push_str(text);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), RenderError> {
        if self.fail_refresh {
            return Err(RenderError::Io(std::io::Error::other("refresh failed")));
        }
        self.frames.push(self.pending.clone());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), RenderError> {
        self.shut_down = true;
        Ok(())
    }
}
