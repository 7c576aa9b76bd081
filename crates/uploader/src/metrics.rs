//! Upload stage metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters for the upload worker.
#[derive(Debug, Default)]
pub struct UploadMetrics {
    /// Frames waiting in the channel when last observed
    queue_len: AtomicUsize,
    /// Uploads that completed with a success status
    uploaded: AtomicU64,
    /// Uploads that failed (transport error or non-success status)
    failed: AtomicU64,
}

impl UploadMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get last observed queue length
    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    /// Set observed queue length
    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    /// Get successful upload count
    pub fn uploaded(&self) -> u64 {
        self.uploaded.load(Ordering::Relaxed)
    }

    /// Increment successful upload count
    pub fn inc_uploaded(&self) {
        self.uploaded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failed upload count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Increment failed upload count
    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> UploadSnapshot {
        UploadSnapshot {
            queue_len: self.queue_len(),
            uploaded: self.uploaded(),
            failed: self.failed(),
        }
    }
}

/// Snapshot of upload metrics (for reporting)
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadSnapshot {
    pub queue_len: usize,
    pub uploaded: u64,
    pub failed: u64,
}
