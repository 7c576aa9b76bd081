//! Capture stage metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the poller and the trigger.
#[derive(Debug, Default)]
pub struct CaptureMetrics {
    /// Edges observed (either direction)
    edges_seen: AtomicU64,
    /// Captures performed
    captures: AtomicU64,
    /// Frames handed to the channel
    frames_enqueued: AtomicU64,
}

impl CaptureMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed edge
    pub fn record_edge(&self) {
        self.edges_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed capture
    pub fn record_capture(&self) {
        self.captures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one frame enqueued
    pub fn record_enqueued(&self) {
        self.frames_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Edges observed so far
    pub fn edges_seen(&self) -> u64 {
        self.edges_seen.load(Ordering::Relaxed)
    }

    /// Captures performed so far
    pub fn captures(&self) -> u64 {
        self.captures.load(Ordering::Relaxed)
    }

    /// Frames enqueued so far
    pub fn frames_enqueued(&self) -> u64 {
        self.frames_enqueued.load(Ordering::Relaxed)
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            edges_seen: self.edges_seen(),
            captures: self.captures(),
            frames_enqueued: self.frames_enqueued(),
        }
    }
}

/// Snapshot of capture metrics (for reporting)
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureSnapshot {
    pub edges_seen: u64,
    pub captures: u64,
    pub frames_enqueued: u64,
}
