//! Raspberry Pi device stack
//!
//! Real `DigitalLine` / `StillCamera` implementations: a GPIO input pin
//! via rppal and a V4L2 camera delivering encoder-produced MJPEG frames.
//! Only compiled with the `real-hardware` feature.

use bytes::Bytes;
use contracts::{CameraOptions, CaptureMode, DigitalLine, Level, ShutterError, StillCamera};
use rppal::gpio::{Gpio, InputPin};
use tracing::{debug, trace};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

/// Frames discarded per capture so auto-exposure settles.
const WARMUP_FRAMES: usize = 2;

/// GPIO input line acquired for the poller's lifetime.
///
/// The pin is requested with a pull-down, so the idle level is `Low` and a
/// press reads `High`. rppal resets the pin on drop, which gives the
/// release-on-every-exit-path behavior the pipeline relies on.
pub struct GpioLine {
    name: String,
    pin: InputPin,
}

impl GpioLine {
    /// Acquire the pin named by a logical identifier such as `GPIO26`.
    pub fn acquire(name: &str) -> Result<Self, ShutterError> {
        let number = parse_pin_name(name)
            .ok_or_else(|| ShutterError::line_acquire(name, "expected a name like GPIO26"))?;

        let gpio = Gpio::new().map_err(|e| ShutterError::line_acquire(name, e.to_string()))?;
        let pin = gpio
            .get(number)
            .map_err(|e| ShutterError::line_acquire(name, e.to_string()))?
            .into_input_pulldown();

        debug!(line = %name, pin = number, "gpio line acquired");
        Ok(Self {
            name: name.to_string(),
            pin,
        })
    }
}

impl DigitalLine for GpioLine {
    fn read(&mut self) -> Result<Level, ShutterError> {
        let level = Level::from(self.pin.is_high());
        trace!(line = %self.name, ?level, "gpio read");
        Ok(level)
    }
}

/// Extract the BCM pin number from a logical name like `GPIO26`.
fn parse_pin_name(name: &str) -> Option<u8> {
    name.trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()
}

/// V4L2 still camera.
///
/// Negotiates the MJPG pixel format so every captured frame already is an
/// encoded JPEG; no re-encode step exists in the pipeline. The device
/// handle is opened on `start` and closed on `stop`/drop.
pub struct V4lCamera {
    device_index: usize,
    options: CameraOptions,
    device: Option<Device>,
}

impl V4lCamera {
    /// Camera backed by `/dev/video{index}`.
    pub fn new(device_index: usize) -> Self {
        Self {
            device_index,
            options: CameraOptions::still(),
            device: None,
        }
    }
}

impl StillCamera for V4lCamera {
    fn configure(&mut self, options: &CameraOptions) -> Result<(), ShutterError> {
        if self.device.is_some() {
            return Err(ShutterError::camera_configure(
                "cannot reconfigure a started camera",
            ));
        }
        if options.mode != CaptureMode::Still {
            return Err(ShutterError::camera_configure(
                "v4l camera supports still mode only",
            ));
        }
        self.options = *options;
        Ok(())
    }

    fn start(&mut self) -> Result<(), ShutterError> {
        let device = Device::new(self.device_index)
            .map_err(|e| ShutterError::camera_configure(e.to_string()))?;

        let mut format = device
            .format()
            .map_err(|e| ShutterError::camera_configure(e.to_string()))?;
        format.fourcc = FourCC::new(b"MJPG");
        let negotiated = device
            .set_format(&format)
            .map_err(|e| ShutterError::camera_configure(e.to_string()))?;

        if negotiated.fourcc != FourCC::new(b"MJPG") {
            return Err(ShutterError::camera_configure(format!(
                "device /dev/video{} does not offer MJPG (got {})",
                self.device_index, negotiated.fourcc
            )));
        }

        debug!(
            device = self.device_index,
            mode = ?self.options.mode,
            width = negotiated.width,
            height = negotiated.height,
            "camera started"
        );
        self.device = Some(device);
        Ok(())
    }

    fn capture(&mut self) -> Result<Bytes, ShutterError> {
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| ShutterError::camera_capture("camera not started"))?;

        let mut stream = Stream::with_buffers(device, Type::VideoCapture, 4)
            .map_err(|e| ShutterError::camera_capture(e.to_string()))?;

        for _ in 0..WARMUP_FRAMES {
            stream
                .next()
                .map_err(|e| ShutterError::camera_capture(e.to_string()))?;
        }

        let (buffer, meta) = stream
            .next()
            .map_err(|e| ShutterError::camera_capture(e.to_string()))?;
        let used = meta.bytesused as usize;

        trace!(bytes = used, "frame captured");
        Ok(Bytes::copy_from_slice(&buffer[..used]))
    }

    fn stop(&mut self) {
        if self.device.take().is_some() {
            debug!(device = self.device_index, "camera stopped");
        }
    }
}
