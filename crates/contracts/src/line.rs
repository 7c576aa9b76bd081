//! DigitalLine trait - button input abstraction

use crate::{Level, ShutterError};

/// A digital input line sampled by the button poller.
///
/// Abstracts the common behavior of a real GPIO line and the scripted
/// mocks so the poller is independent of the hardware stack. The line is
/// acquired when the implementation is constructed and released on `Drop`,
/// so every exit path of the pipeline gives the pin back.
///
/// `read` may block briefly (a register read, not a wait for an edge).
pub trait DigitalLine: Send {
    /// Sample the current line level.
    ///
    /// # Errors
    /// An I/O error reading the line is fatal to the polling stage.
    fn read(&mut self) -> Result<Level, ShutterError>;
}
