//! ImageFrame - capture output

use bytes::Bytes;

/// One captured still image on its way to the uploader.
///
/// Produced once per qualifying edge. Immutable after construction;
/// ownership moves producer → channel → uploader, no two stages hold it
/// concurrently after handoff.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    /// Monotonic capture sequence number (1-based)
    pub frame_id: u64,

    /// Encoded JPEG bytes
    pub jpeg: Bytes,
}

impl ImageFrame {
    /// Create a frame from encoded bytes.
    pub fn new(frame_id: u64, jpeg: Bytes) -> Self {
        Self { frame_id, jpeg }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }
}
