//! Mock camera
//!
//! Implements `StillCamera` without a sensor: serves a canned JPEG and
//! enforces the configure/start/capture/stop protocol, with optional
//! failure injection for tests.

use bytes::Bytes;
use contracts::{CameraOptions, CaptureMode, ShutterError, StillCamera};
use tracing::{debug, trace};

/// Smallest JPEG-shaped payload the mock can serve: SOI marker, a comment
/// segment, EOI marker. Enough for content-type checks on the wire.
const DEMO_JPEG: &[u8] = &[
    0xFF, 0xD8, // SOI
    0xFF, 0xFE, 0x00, 0x06, b'd', b'e', b'm', b'o', // COM "demo"
    0xFF, 0xD9, // EOI
];

/// Mock still camera.
#[derive(Debug)]
pub struct MockCamera {
    payload: Bytes,
    configured: Option<CameraOptions>,
    started: bool,
    captures: u64,
    fail_after: Option<u64>,
}

impl MockCamera {
    /// Camera serving the built-in demo JPEG.
    pub fn new() -> Self {
        Self::with_payload(Bytes::from_static(DEMO_JPEG))
    }

    /// Camera serving a caller-provided payload.
    pub fn with_payload(payload: Bytes) -> Self {
        Self {
            payload,
            configured: None,
            started: false,
            captures: 0,
            fail_after: None,
        }
    }

    /// Make capture number `n + 1` (and all later ones) fail.
    pub fn fail_after(mut self, n: u64) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Captures performed so far.
    pub fn captures(&self) -> u64 {
        self.captures
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl StillCamera for MockCamera {
    fn configure(&mut self, options: &CameraOptions) -> Result<(), ShutterError> {
        if self.started {
            return Err(ShutterError::camera_configure(
                "cannot reconfigure a started camera",
            ));
        }
        debug!(mode = ?options.mode, "mock camera configured");
        self.configured = Some(*options);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ShutterError> {
        match self.configured {
            Some(options) if options.mode == CaptureMode::Still => {
                self.started = true;
                debug!("mock camera started");
                Ok(())
            }
            Some(_) => Err(ShutterError::camera_configure(
                "mock camera supports still mode only",
            )),
            None => Err(ShutterError::camera_configure("camera not configured")),
        }
    }

    fn capture(&mut self) -> Result<Bytes, ShutterError> {
        if !self.started {
            return Err(ShutterError::camera_capture("camera not started"));
        }
        if let Some(limit) = self.fail_after {
            if self.captures >= limit {
                return Err(ShutterError::camera_capture("injected capture failure"));
            }
        }
        self.captures += 1;
        trace!(capture = self.captures, "mock capture");
        Ok(self.payload.clone())
    }

    fn stop(&mut self) {
        if self.started {
            self.started = false;
            debug!(captures = self.captures, "mock camera stopped");
        }
    }
}
