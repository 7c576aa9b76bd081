//! Pipeline statistics.

use std::time::Duration;

use capture::CaptureSnapshot;
use uploader::UploadSnapshot;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Edges observed on the button line (either direction)
    pub edges_seen: u64,

    /// Captures performed
    pub captures: u64,

    /// Frames handed to the channel
    pub frames_enqueued: u64,

    /// Uploads that completed with a success status
    pub uploaded: u64,

    /// Uploads that failed (transport error or non-success status)
    pub failed_uploads: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,
}

impl PipelineStats {
    /// Combine the stage snapshots into run statistics.
    pub fn new(capture: CaptureSnapshot, upload: UploadSnapshot, duration: Duration) -> Self {
        Self {
            edges_seen: capture.edges_seen,
            captures: capture.captures,
            frames_enqueued: capture.frames_enqueued,
            uploaded: upload.uploaded,
            failed_uploads: upload.failed,
            duration,
        }
    }

    /// Captures per minute over the whole run.
    pub fn capture_rate(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.captures as f64 * 60.0 / secs
        } else {
            0.0
        }
    }

    /// Print a human-readable run summary.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===\n");
        println!("Edges observed:   {}", self.edges_seen);
        println!("Captures:         {}", self.captures);
        println!("Frames enqueued:  {}", self.frames_enqueued);
        println!("Uploads ok:       {}", self.uploaded);
        println!("Uploads failed:   {}", self.failed_uploads);
        println!("Duration:         {:.2} s", self.duration.as_secs_f64());
        println!("Capture rate:     {:.2} / min", self.capture_rate());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_rate_handles_zero_duration() {
        let stats = PipelineStats::default();
        assert_eq!(stats.capture_rate(), 0.0);
    }

    #[test]
    fn capture_rate_is_per_minute() {
        let stats = PipelineStats {
            captures: 30,
            duration: Duration::from_secs(60),
            ..Default::default()
        };
        assert!((stats.capture_rate() - 30.0).abs() < f64::EPSILON);
    }
}
