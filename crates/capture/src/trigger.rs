//! CaptureTrigger - blocking capture + bounded enqueue

use std::sync::Arc;

use async_channel::Sender;
use contracts::{CameraOptions, ImageFrame, ShutterError, StillCamera};
use tracing::{debug, info};

use crate::metrics::CaptureMetrics;

/// Fires one blocking capture per qualifying edge and hands the frame to
/// the bounded channel.
///
/// Invoked synchronously from the poller loop, so captures serialize with
/// polling: at most one capture is in flight, and a slow capture simply
/// delays the next sample. `send_blocking` provides the backpressure; the
/// poller stalls rather than drop a frame when the channel is full.
///
/// Construction configures and starts the camera; `Drop` stops it, so the
/// sensor is released on every exit path.
pub struct CaptureTrigger<C: StillCamera> {
    camera: C,
    tx: Sender<ImageFrame>,
    metrics: Arc<CaptureMetrics>,
    next_frame_id: u64,
}

impl<C: StillCamera> CaptureTrigger<C> {
    /// Configure the camera for still capture, start it, and wire the
    /// trigger to the channel.
    pub fn new(
        mut camera: C,
        tx: Sender<ImageFrame>,
        metrics: Arc<CaptureMetrics>,
    ) -> Result<Self, ShutterError> {
        camera.configure(&CameraOptions::still())?;
        camera.start()?;
        debug!("capture trigger ready");

        Ok(Self {
            camera,
            tx,
            metrics,
            next_frame_id: 0,
        })
    }

    /// Capture one image and enqueue it. Returns the running capture
    /// count.
    ///
    /// # Errors
    /// A capture failure or a closed channel is fatal to the owning stage.
    pub fn fire(&mut self) -> Result<u64, ShutterError> {
        info!("capture image");
        let jpeg = self.camera.capture()?;
        self.metrics.record_capture();

        self.next_frame_id += 1;
        let frame = ImageFrame::new(self.next_frame_id, jpeg);
        let frame_id = frame.frame_id;
        let bytes = frame.len();

        self.tx
            .send_blocking(frame)
            .map_err(|_| ShutterError::channel_closed("capture"))?;
        self.metrics.record_enqueued();
        debug!(frame_id, bytes, "frame enqueued");

        Ok(self.next_frame_id)
    }

    /// Captures performed so far.
    pub fn captures(&self) -> u64 {
        self.next_frame_id
    }
}

impl<C: StillCamera> Drop for CaptureTrigger<C> {
    fn drop(&mut self) {
        self.camera.stop();
    }
}
