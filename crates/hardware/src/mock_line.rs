//! Mock digital lines
//!
//! Implement `DigitalLine` without hardware. `ScriptedLine` replays a
//! fixed sample sequence (tests); `PulsingLine` simulates periodic button
//! presses (demo mode).

use contracts::{DigitalLine, Level, ShutterError};
use tracing::trace;

/// Line that replays a scripted sequence of levels.
///
/// After the script is exhausted it keeps returning the last value, or
/// fails every read if built with [`Self::fail_when_exhausted`], the hook
/// for exercising the fatal line-error path.
#[derive(Debug)]
pub struct ScriptedLine {
    name: String,
    script: Vec<Level>,
    pos: usize,
    fail_when_exhausted: bool,
}

impl ScriptedLine {
    /// Create a line that replays `script` and then holds the last level.
    pub fn new(name: impl Into<String>, script: Vec<Level>) -> Self {
        assert!(!script.is_empty(), "script must contain at least one sample");
        Self {
            name: name.into(),
            script,
            pos: 0,
            fail_when_exhausted: false,
        }
    }

    /// Fail every read once the script runs out.
    pub fn fail_when_exhausted(mut self) -> Self {
        self.fail_when_exhausted = true;
        self
    }

    /// How many samples have been read so far.
    pub fn samples_read(&self) -> usize {
        self.pos
    }
}

impl DigitalLine for ScriptedLine {
    fn read(&mut self) -> Result<Level, ShutterError> {
        if self.pos >= self.script.len() {
            if self.fail_when_exhausted {
                return Err(ShutterError::line_read(&self.name, "script exhausted"));
            }
            return Ok(self.script.last().copied().unwrap_or(Level::Low));
        }

        let level = self.script[self.pos];
        self.pos += 1;
        trace!(line = %self.name, sample = self.pos, ?level, "scripted read");
        Ok(level)
    }
}

/// Line that reports one `High` sample every `period` reads.
///
/// Simulates a button pressed briefly at a fixed cadence, so the demo mode
/// produces captures without a physical pin.
#[derive(Debug)]
pub struct PulsingLine {
    name: String,
    period: usize,
    reads: usize,
}

impl PulsingLine {
    /// Pulse high once every `period` samples (period ≥ 2).
    pub fn new(name: impl Into<String>, period: usize) -> Self {
        Self {
            name: name.into(),
            period: period.max(2),
            reads: 0,
        }
    }
}

impl DigitalLine for PulsingLine {
    fn read(&mut self) -> Result<Level, ShutterError> {
        self.reads += 1;
        let level = Level::from(self.reads % self.period == 0);
        if level.is_high() {
            trace!(line = %self.name, read = self.reads, "pulse");
        }
        Ok(level)
    }
}
