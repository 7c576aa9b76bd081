//! Layered error definitions
//!
//! Categorized by source: line / camera / channel / upload. Hardware
//! errors are fatal to their stage; upload errors are absorbed per item by
//! the worker loop.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ShutterError {
    // ===== Line Errors =====
    /// GPIO line acquisition error
    #[error("line '{line}' acquire error: {message}")]
    LineAcquire { line: String, message: String },

    /// GPIO line read error
    #[error("line '{line}' read error: {message}")]
    LineRead { line: String, message: String },

    // ===== Camera Errors =====
    /// Camera configuration error
    #[error("camera configure error: {message}")]
    CameraConfigure { message: String },

    /// Camera capture error
    #[error("camera capture error: {message}")]
    CameraCapture { message: String },

    // ===== Channel Errors =====
    /// Bounded channel closed while a stage still needed it
    #[error("channel closed at stage '{stage}'")]
    ChannelClosed { stage: String },

    // ===== Upload Errors =====
    /// Upload transport error
    #[error("upload to '{endpoint}' failed: {message}")]
    Upload { endpoint: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ShutterError {
    /// Create line acquisition error
    pub fn line_acquire(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LineAcquire {
            line: line.into(),
            message: message.into(),
        }
    }

    /// Create line read error
    pub fn line_read(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LineRead {
            line: line.into(),
            message: message.into(),
        }
    }

    /// Create camera configuration error
    pub fn camera_configure(message: impl Into<String>) -> Self {
        Self::CameraConfigure {
            message: message.into(),
        }
    }

    /// Create camera capture error
    pub fn camera_capture(message: impl Into<String>) -> Self {
        Self::CameraCapture {
            message: message.into(),
        }
    }

    /// Create channel closed error
    pub fn channel_closed(stage: impl Into<String>) -> Self {
        Self::ChannelClosed {
            stage: stage.into(),
        }
    }

    /// Create upload transport error
    pub fn upload(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upload {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Whether this error ends the whole pipeline rather than one item.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Upload { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_are_not_fatal() {
        assert!(!ShutterError::upload("http://localhost", "refused").is_fatal());
        assert!(ShutterError::line_read("GPIO26", "gone").is_fatal());
        assert!(ShutterError::camera_capture("sensor timeout").is_fatal());
    }
}
