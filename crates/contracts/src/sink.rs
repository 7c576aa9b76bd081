//! UploadSink trait - upload worker output interface

use crate::{ImageFrame, ShutterError};

/// Destination for captured frames.
///
/// The worker loop drives exactly one sink; implementations perform one
/// network round trip per frame and report the resulting HTTP status.
#[trait_variant::make(UploadSink: Send)]
pub trait LocalUploadSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Upload one frame and return the response status code.
    ///
    /// A completed round trip is `Ok(status)` whatever the status value;
    /// only transport failures are errors. The response body is ignored.
    async fn send(&mut self, frame: &ImageFrame) -> Result<u16, ShutterError>;
}
