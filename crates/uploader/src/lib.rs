//! # Uploader
//!
//! The cooperatively-scheduled half of the pipeline: drains the bounded
//! frame channel and performs one HTTP round trip per frame. A failed
//! individual upload is logged and absorbed (losing one upload must not
//! kill the capture pipeline); channel close and the shutdown token end
//! the stage.

mod http;
mod metrics;
mod worker;

pub use http::{normalize_endpoint, HttpSink, HttpSinkConfig};
pub use metrics::{UploadMetrics, UploadSnapshot};
pub use worker::drain;
