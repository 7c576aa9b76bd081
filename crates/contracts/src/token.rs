//! ShutdownToken - shared cooperative cancellation flag

use tokio_util::sync::CancellationToken;

/// Single-writer, multi-reader shutdown flag shared by every stage.
///
/// Once set it is never unset. The thread-scheduled half polls
/// [`is_requested`](Self::is_requested) between loop iterations; the
/// cooperatively-scheduled half awaits [`requested`](Self::requested) at
/// its suspension points. Handed to every component at construction, never
/// ambient state.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: CancellationToken,
}

impl ShutdownToken {
    /// Create a fresh, unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag. Idempotent.
    pub fn request(&self) {
        self.inner.cancel();
    }

    /// Synchronous check, for blocking loops.
    pub fn is_requested(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Completes once the flag is set. Safe to await from any number of
    /// clones concurrently.
    pub async fn requested(&self) {
        self.inner.cancelled().await;
    }
}
