//! # Hardware
//!
//! Hardware collaborators behind the `contracts` trait seam.
//!
//! Mock implementations are always built and back the tests and the
//! no-hardware demo mode. The real Raspberry Pi stack (rppal GPIO line,
//! V4L2 camera) lives behind the `real-hardware` feature so the default
//! build runs anywhere.

mod mock_camera;
mod mock_line;

#[cfg(feature = "real-hardware")]
mod rpi;

pub use mock_camera::MockCamera;
pub use mock_line::{PulsingLine, ScriptedLine};

#[cfg(feature = "real-hardware")]
pub use rpi::{GpioLine, V4lCamera};
