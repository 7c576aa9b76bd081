//! ButtonPoller - fixed-interval edge detection loop

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use contracts::{DigitalLine, ShutdownToken, ShutterError, StillCamera};
use tracing::{debug, info, trace};

use crate::metrics::CaptureMetrics;
use crate::trigger::CaptureTrigger;

/// Samples the button line at a fixed interval and fires the trigger on
/// each rising edge.
///
/// Runs on a dedicated blocking worker. The shutdown token is observed
/// once per iteration, so cancellation latency is bounded by one polling
/// interval; the sleep itself is not cancellable mid-way. The interval is
/// also the only debounce window.
pub struct ButtonPoller<L: DigitalLine> {
    line: L,
    interval: Duration,
    token: ShutdownToken,
    metrics: Arc<CaptureMetrics>,
    max_captures: Option<u64>,
}

impl<L: DigitalLine> ButtonPoller<L> {
    /// Create a poller over an acquired line.
    pub fn new(
        line: L,
        interval: Duration,
        token: ShutdownToken,
        metrics: Arc<CaptureMetrics>,
    ) -> Self {
        Self {
            line,
            interval,
            token,
            metrics,
            max_captures: None,
        }
    }

    /// End the stage normally once this many captures have fired.
    pub fn with_max_captures(mut self, limit: Option<u64>) -> Self {
        self.max_captures = limit;
        self
    }

    /// Run until the token is set, the capture limit is reached, or a
    /// hardware error occurs.
    ///
    /// Falling edges are observed (and counted) but ignored downstream.
    pub fn run<C: StillCamera>(
        mut self,
        mut trigger: CaptureTrigger<C>,
    ) -> Result<(), ShutterError> {
        let mut last = self.line.read()?;
        debug!(initial = ?last, interval_ms = self.interval.as_millis() as u64, "poller started");

        while !self.token.is_requested() {
            thread::sleep(self.interval);

            let level = self.line.read()?;
            if level == last {
                continue;
            }

            debug!(from = ?last, to = ?level, "edge detected");
            self.metrics.record_edge();
            let rising = level.is_rising_from(last);
            last = level;

            if !rising {
                continue;
            }

            trace!("button pressed");
            let captures = trigger.fire()?;

            if let Some(limit) = self.max_captures {
                if captures >= limit {
                    info!(captures, "capture limit reached");
                    return Ok(());
                }
            }
        }

        debug!("poller observed shutdown");
        Ok(())
    }
}
