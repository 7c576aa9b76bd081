//! StillCamera trait - camera collaborator abstraction

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::ShutterError;

/// Camera operating mode.
///
/// Only still mode is exercised by the pipeline; preview exists for
/// interactive diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Full-resolution single-shot capture
    #[default]
    Still,
    /// Low-latency preview stream
    Preview,
}

/// Camera configuration options.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraOptions {
    /// Operating mode
    pub mode: CaptureMode,
}

impl CameraOptions {
    /// Options for single-shot still capture.
    pub fn still() -> Self {
        Self {
            mode: CaptureMode::Still,
        }
    }
}

/// A blocking still camera.
///
/// `capture` blocks the calling thread for the sensor exposure and encode
/// duration, so the pipeline only ever calls it from a dedicated worker,
/// serialized with polling: at most one capture is in flight.
pub trait StillCamera: Send {
    /// Apply configuration. Must be called before `start`.
    fn configure(&mut self, options: &CameraOptions) -> Result<(), ShutterError>;

    /// Start the sensor.
    fn start(&mut self) -> Result<(), ShutterError>;

    /// Capture one image and return the encoded JPEG bytes.
    ///
    /// # Errors
    /// A capture failure is fatal to the owning stage; there is no
    /// automatic retry of a single capture.
    fn capture(&mut self) -> Result<Bytes, ShutterError>;

    /// Stop the sensor. Idempotent; called on every pipeline exit path.
    fn stop(&mut self);
}
