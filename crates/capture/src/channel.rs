//! Bounded frame channel

use async_channel::{Receiver, Sender};
use contracts::ImageFrame;

/// Create the bounded FIFO channel between the capture and upload stages.
///
/// The producer side blocks when the channel is full (backpressure, never
/// a drop); the consumer side suspends when empty and
/// drains remaining items after close before observing end-of-stream.
/// Close is idempotent. Capacity below 1 is clamped to 1.
pub fn frame_channel(capacity: usize) -> (Sender<ImageFrame>, Receiver<ImageFrame>) {
    async_channel::bounded(capacity.max(1))
}
