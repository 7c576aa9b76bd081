//! # Contracts
//!
//! Frozen interface contracts between the pipeline crates: shared data
//! types, hardware traits, the upload sink trait, the shutdown token and
//! the unified error type. All business crates depend only on this crate,
//! reverse dependencies are prohibited.

mod camera;
mod error;
mod frame;
mod level;
mod line;
mod sink;
mod token;

pub use camera::{CameraOptions, CaptureMode, StillCamera};
pub use error::ShutterError;
pub use frame::ImageFrame;
pub use level::Level;
pub use line::DigitalLine;
pub use sink::{LocalUploadSink, UploadSink};
pub use token::ShutdownToken;
