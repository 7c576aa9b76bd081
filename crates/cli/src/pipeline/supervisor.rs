//! Pipeline supervisor - builds the stages, races them to first
//! completion, and drives the cooperative shutdown.
//!
//! The blocking half (poller + trigger) runs on a `spawn_blocking` worker;
//! the upload worker is a plain task. The supervisor owns the shutdown
//! token: the first stage to end (or an OS interrupt, or the optional run
//! deadline) moves the pipeline to Draining, the token is set, and the
//! remaining stages are joined under a bounded grace period.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use capture::{frame_channel, ButtonPoller, CaptureMetrics, CaptureTrigger};
use contracts::{DigitalLine, ShutdownToken, ShutterError, StillCamera, UploadSink};
use serde::Serialize;
use tokio::task::JoinError;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uploader::{HttpSink, HttpSinkConfig, UploadMetrics};

use super::PipelineStats;
use crate::cli::RunArgs;

/// How long Draining may take before a remaining stage is abandoned.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Resolved pipeline configuration
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Logical button line identifier
    pub button: String,

    /// Upload endpoint (normalized to carry a scheme)
    pub endpoint: String,

    /// Shared secret sent with every upload
    #[serde(skip)]
    pub secret: String,

    /// Button polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Frame channel capacity
    pub channel_capacity: usize,

    /// Per-request upload timeout in seconds (0 = unbounded)
    pub request_timeout_secs: u64,

    /// Run duration limit in seconds (0 = none)
    pub run_timeout_secs: u64,

    /// Capture limit (0 = unlimited)
    pub max_captures: u64,

    /// V4L2 device index (real hardware only)
    pub camera_device: usize,

    /// Samples between simulated presses (demo mode only)
    pub demo_pulse: usize,
}

impl PipelineConfig {
    /// Resolve configuration from CLI arguments.
    pub fn from_args(args: &RunArgs) -> Self {
        Self {
            button: args.button.clone(),
            endpoint: uploader::normalize_endpoint(&args.endpoint),
            secret: args.secret.clone(),
            poll_interval_ms: args.interval_ms,
            channel_capacity: args.capacity,
            request_timeout_secs: args.request_timeout,
            run_timeout_secs: args.timeout,
            max_captures: args.max_captures,
            camera_device: args.camera_device,
            demo_pulse: args.demo_pulse,
        }
    }

    /// Polling interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-request timeout, `None` when unbounded.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Run duration limit, `None` when the pipeline runs until interrupted.
    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }

    /// Capture limit, `None` when unlimited.
    pub fn capture_limit(&self) -> Option<u64> {
        (self.max_captures > 0).then_some(self.max_captures)
    }

    /// Which hardware stack this build drives.
    pub fn mode(&self) -> &'static str {
        if cfg!(feature = "real-hardware") {
            "real"
        } else {
            "demo"
        }
    }
}

/// Supervisor lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    Starting,
    Running,
    Draining,
    Stopped,
}

/// Which event ended the Running state first
enum FirstEnd {
    Poller(Result<(), ShutterError>),
    Uploader,
    Interrupt,
    Deadline,
}

/// Main pipeline supervisor
pub struct Pipeline {
    config: PipelineConfig,
    state: PipelineState,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Starting,
        }
    }

    /// Run with the hardware stack selected by the build's feature set.
    pub async fn run(self) -> Result<PipelineStats> {
        let sink = HttpSink::new(
            "post_image",
            HttpSinkConfig {
                endpoint: self.config.endpoint.clone(),
                secret: self.config.secret.clone(),
                request_timeout: self.config.request_timeout(),
            },
        )?;
        let line = acquire_line(&self.config)?;
        let camera = build_camera(&self.config);

        self.run_with(line, camera, sink).await
    }

    /// Run over explicit collaborators. Tests inject mocks here.
    pub async fn run_with<L, C, S>(mut self, line: L, camera: C, sink: S) -> Result<PipelineStats>
    where
        L: DigitalLine + 'static,
        C: StillCamera + 'static,
        S: UploadSink + 'static,
    {
        let start = Instant::now();
        let token = ShutdownToken::new();
        let (tx, rx) = frame_channel(self.config.channel_capacity);
        let capture_metrics = Arc::new(CaptureMetrics::new());
        let upload_metrics = Arc::new(UploadMetrics::new());

        info!(
            mode = self.config.mode(),
            button = %self.config.button,
            endpoint = %self.config.endpoint,
            interval_ms = self.config.poll_interval_ms,
            capacity = self.config.channel_capacity,
            "starting pipeline"
        );

        let trigger = CaptureTrigger::new(camera, tx, capture_metrics.clone())
            .context("camera startup failed")?;
        let poller = ButtonPoller::new(
            line,
            self.config.poll_interval(),
            token.clone(),
            capture_metrics.clone(),
        )
        .with_max_captures(self.config.capture_limit());

        let mut poller_handle = tokio::task::spawn_blocking(move || poller.run(trigger));
        let mut upload_handle = tokio::spawn(uploader::drain(
            sink,
            rx.clone(),
            token.clone(),
            upload_metrics.clone(),
        ));
        self.transition(PipelineState::Running);

        let first = tokio::select! {
            res = &mut poller_handle => FirstEnd::Poller(flatten_poller(res)),
            _ = &mut upload_handle => FirstEnd::Uploader,
            _ = shutdown_signal() => FirstEnd::Interrupt,
            _ = run_deadline(self.config.run_timeout()) => FirstEnd::Deadline,
        };

        self.transition(PipelineState::Draining);
        token.request();

        let mut fatal: Option<ShutterError> = None;
        let mut poller_done = false;
        let mut uploader_done = false;
        match first {
            FirstEnd::Poller(res) => {
                poller_done = true;
                match res {
                    Ok(()) => info!("poller completed"),
                    Err(e) => {
                        error!(error = %e, "poller failed");
                        fatal = Some(e);
                    }
                }
            }
            FirstEnd::Uploader => {
                uploader_done = true;
                info!("upload worker completed");
            }
            FirstEnd::Interrupt => info!("interrupt received"),
            FirstEnd::Deadline => {
                info!(secs = self.config.run_timeout_secs, "run duration limit reached");
            }
        }

        if !poller_done {
            match timeout(SHUTDOWN_GRACE, &mut poller_handle).await {
                Ok(res) => {
                    if let Err(e) = flatten_poller(res) {
                        error!(error = %e, "poller failed during drain");
                        fatal = Some(e);
                    }
                }
                Err(_) => warn!("poller did not stop within the grace period"),
            }
        }

        if !uploader_done {
            match timeout(SHUTDOWN_GRACE, &mut upload_handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "upload worker panicked"),
                Err(_) => warn!("upload worker did not stop within the grace period"),
            }
        }

        rx.close();
        self.transition(PipelineState::Stopped);

        let stats = PipelineStats::new(
            capture_metrics.snapshot(),
            upload_metrics.snapshot(),
            start.elapsed(),
        );
        info!(
            edges = stats.edges_seen,
            captures = stats.captures,
            uploaded = stats.uploaded,
            failed_uploads = stats.failed_uploads,
            duration_secs = format!("{:.2}", stats.duration.as_secs_f64()),
            "pipeline stopped"
        );

        match fatal {
            Some(e) => Err(anyhow::Error::new(e).context("pipeline ended on a fatal stage error")),
            None => Ok(stats),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        if self.state == PipelineState::Stopped || self.state == next {
            return;
        }
        info!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }
}

/// Collapse a blocking-worker join result into the stage result.
fn flatten_poller(
    res: Result<Result<(), ShutterError>, JoinError>,
) -> Result<(), ShutterError> {
    match res {
        Ok(inner) => inner,
        Err(e) => Err(ShutterError::Other(format!("poller worker panicked: {e}"))),
    }
}

/// Completes when the optional run duration limit elapses.
async fn run_deadline(limit: Option<Duration>) {
    match limit {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(feature = "real-hardware")]
fn acquire_line(config: &PipelineConfig) -> Result<hardware::GpioLine> {
    Ok(hardware::GpioLine::acquire(&config.button)?)
}

#[cfg(not(feature = "real-hardware"))]
fn acquire_line(config: &PipelineConfig) -> Result<hardware::PulsingLine> {
    info!(
        button = %config.button,
        pulse_every = config.demo_pulse,
        "built without real-hardware, simulating button presses"
    );
    Ok(hardware::PulsingLine::new(&config.button, config.demo_pulse))
}

#[cfg(feature = "real-hardware")]
fn build_camera(config: &PipelineConfig) -> hardware::V4lCamera {
    hardware::V4lCamera::new(config.camera_device)
}

#[cfg(not(feature = "real-hardware"))]
fn build_camera(_config: &PipelineConfig) -> hardware::MockCamera {
    hardware::MockCamera::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ImageFrame, Level};
    use hardware::{MockCamera, PulsingLine, ScriptedLine};
    use std::sync::Mutex;

    /// Sink that records the frames it saw and always answers 200.
    struct RecordingSink {
        seen: Arc<Mutex<Vec<u64>>>,
    }

    impl RecordingSink {
        fn new() -> (Self, Arc<Mutex<Vec<u64>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (Self { seen: seen.clone() }, seen)
        }
    }

    impl UploadSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&mut self, frame: &ImageFrame) -> Result<u16, ShutterError> {
            self.seen.lock().unwrap().push(frame.frame_id);
            Ok(200)
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            button: "GPIO26".to_string(),
            endpoint: "http://localhost:1323".to_string(),
            secret: "raspitoken".to_string(),
            poll_interval_ms: 5,
            channel_capacity: 10,
            request_timeout_secs: 1,
            run_timeout_secs: 0,
            max_captures: 0,
            camera_device: 0,
            demo_pulse: 20,
        }
    }

    #[tokio::test]
    async fn two_presses_are_captured_and_uploaded_in_order() {
        let mut config = test_config();
        config.max_captures = 2;

        let line = ScriptedLine::new(
            "GPIO26",
            vec![Level::Low, Level::High, Level::Low, Level::High],
        );
        let (sink, seen) = RecordingSink::new();

        let stats = Pipeline::new(config)
            .run_with(line, MockCamera::new(), sink)
            .await
            .unwrap();

        assert_eq!(stats.captures, 2);
        assert_eq!(stats.uploaded, 2);
        assert_eq!(stats.failed_uploads, 0);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn line_failure_ends_the_run_with_an_error() {
        let line = ScriptedLine::new("GPIO26", vec![Level::Low]).fail_when_exhausted();
        let (sink, _seen) = RecordingSink::new();

        let result = Pipeline::new(test_config())
            .run_with(line, MockCamera::new(), sink)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn capture_failure_ends_the_run_with_an_error() {
        let line = ScriptedLine::new("GPIO26", vec![Level::Low, Level::High]);
        let (sink, seen) = RecordingSink::new();

        let result = Pipeline::new(test_config())
            .run_with(line, MockCamera::new().fail_after(0), sink)
            .await;

        assert!(result.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_deadline_stops_an_idle_pipeline() {
        let mut config = test_config();
        config.run_timeout_secs = 1;

        // Never pulses within the run window
        let line = PulsingLine::new("GPIO26", 10_000);
        let (sink, _seen) = RecordingSink::new();

        let start = Instant::now();
        let stats = Pipeline::new(config)
            .run_with(line, MockCamera::new(), sink)
            .await
            .unwrap();

        assert_eq!(stats.captures, 0);
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
