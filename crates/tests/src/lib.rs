//! # Integration Tests
//!
//! End-to-end tests over the mock hardware: scripted button presses
//! through the bounded channel into a scripted upload sink, without a
//! network or a GPIO chip.

#[cfg(test)]
mod contract_tests {
    use contracts::{Level, ShutdownToken};

    #[test]
    fn contracts_smoke() {
        assert!(Level::High.is_rising_from(Level::Low));
        let token = ShutdownToken::new();
        assert!(!token.is_requested());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use capture::{frame_channel, ButtonPoller, CaptureMetrics, CaptureTrigger};
    use contracts::{ImageFrame, Level, ShutdownToken, ShutterError, UploadSink};
    use hardware::{MockCamera, PulsingLine, ScriptedLine};
    use tokio::time::timeout;
    use uploader::{drain, UploadMetrics};

    /// Scripted sink: records `(frame_id, outcome)` per attempt. Statuses
    /// are served from a list; past the end every attempt fails with a
    /// transport error.
    struct ScriptedSink {
        statuses: Vec<u16>,
        attempts: Arc<Mutex<Vec<(u64, Option<u16>)>>>,
    }

    impl ScriptedSink {
        fn new(statuses: Vec<u16>) -> (Self, Arc<Mutex<Vec<(u64, Option<u16>)>>>) {
            let attempts = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    statuses,
                    attempts: attempts.clone(),
                },
                attempts,
            )
        }
    }

    impl UploadSink for ScriptedSink {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&mut self, frame: &ImageFrame) -> Result<u16, ShutterError> {
            let mut attempts = self.attempts.lock().unwrap();
            let outcome = self.statuses.get(attempts.len()).copied();
            attempts.push((frame.frame_id, outcome));
            drop(attempts);

            match outcome {
                Some(status) => Ok(status),
                None => Err(ShutterError::upload("scripted", "injected failure")),
            }
        }
    }

    struct Harness {
        token: ShutdownToken,
        capture_metrics: Arc<CaptureMetrics>,
        upload_metrics: Arc<UploadMetrics>,
        poller: tokio::task::JoinHandle<Result<(), ShutterError>>,
        worker: tokio::task::JoinHandle<()>,
    }

    /// Wire poller → channel → upload worker the way the supervisor does.
    fn spawn_pipeline<L, S>(
        line: L,
        sink: S,
        interval: Duration,
        max_captures: Option<u64>,
    ) -> Harness
    where
        L: contracts::DigitalLine + 'static,
        S: UploadSink + 'static,
    {
        let (tx, rx) = frame_channel(10);
        let token = ShutdownToken::new();
        let capture_metrics = Arc::new(CaptureMetrics::new());
        let upload_metrics = Arc::new(UploadMetrics::new());

        let trigger = CaptureTrigger::new(MockCamera::new(), tx, capture_metrics.clone()).unwrap();
        let poller_loop = ButtonPoller::new(line, interval, token.clone(), capture_metrics.clone())
            .with_max_captures(max_captures);

        let poller = tokio::task::spawn_blocking(move || poller_loop.run(trigger));
        let worker = tokio::spawn(drain(sink, rx, token.clone(), upload_metrics.clone()));

        Harness {
            token,
            capture_metrics,
            upload_metrics,
            poller,
            worker,
        }
    }

    /// The distilled scenario: line samples 0,1,0,1 at a 10ms interval
    /// produce exactly two captures and two upload attempts, in order,
    /// each recorded with the injected response status.
    #[tokio::test]
    async fn end_to_end_two_presses() {
        let line = ScriptedLine::new(
            "GPIO26",
            vec![Level::Low, Level::High, Level::Low, Level::High],
        );
        let (sink, attempts) = ScriptedSink::new(vec![200, 201]);

        let harness = spawn_pipeline(line, sink, Duration::from_millis(10), Some(2));

        // Poller ends itself at the capture limit; dropping the trigger
        // closes the channel, the worker drains and exits.
        harness.poller.await.unwrap().unwrap();
        timeout(Duration::from_secs(2), harness.worker)
            .await
            .expect("worker did not drain after channel close")
            .unwrap();

        assert_eq!(harness.capture_metrics.captures(), 2);
        assert_eq!(
            *attempts.lock().unwrap(),
            vec![(1, Some(200)), (2, Some(201))]
        );
        assert_eq!(harness.upload_metrics.uploaded(), 2);
        assert_eq!(harness.upload_metrics.failed(), 0);
    }

    #[tokio::test]
    async fn uploads_preserve_fifo_order_across_many_presses() {
        // Presses every other sample
        let line = PulsingLine::new("GPIO26", 2);
        let (sink, attempts) = ScriptedSink::new(vec![200; 10]);

        let harness = spawn_pipeline(line, sink, Duration::from_millis(1), Some(10));

        harness.poller.await.unwrap().unwrap();
        timeout(Duration::from_secs(2), harness.worker)
            .await
            .unwrap()
            .unwrap();

        let order: Vec<u64> = attempts.lock().unwrap().iter().map(|(id, _)| *id).collect();
        assert_eq!(order, (1..=10).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn upload_failure_for_one_item_does_not_block_the_next() {
        let line = ScriptedLine::new(
            "GPIO26",
            vec![
                Level::Low,
                Level::High,
                Level::Low,
                Level::High,
                Level::Low,
                Level::High,
            ],
        );
        // Second upload is rejected with a 500; the third must still run.
        let (sink, attempts) = ScriptedSink::new(vec![200, 500, 200]);

        let harness = spawn_pipeline(line, sink, Duration::from_millis(1), Some(3));

        harness.poller.await.unwrap().unwrap();
        timeout(Duration::from_secs(2), harness.worker)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(attempts.lock().unwrap().len(), 3);
        assert_eq!(harness.upload_metrics.uploaded(), 2);
        assert_eq!(harness.upload_metrics.failed(), 1);
    }

    #[tokio::test]
    async fn token_shuts_down_every_stage_promptly() {
        // Line never presses; worker waits on an empty channel.
        let line = PulsingLine::new("GPIO26", 10_000);
        let (sink, attempts) = ScriptedSink::new(vec![]);

        let harness = spawn_pipeline(line, sink, Duration::from_millis(5), None);

        tokio::time::sleep(Duration::from_millis(50)).await;
        harness.token.request();

        timeout(Duration::from_millis(500), harness.poller)
            .await
            .expect("poller did not observe the token within one interval")
            .unwrap()
            .unwrap();
        timeout(Duration::from_millis(500), harness.worker)
            .await
            .expect("worker did not observe the token")
            .unwrap();

        assert!(attempts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fatal_line_error_surfaces_while_uploads_continue_draining() {
        let line = ScriptedLine::new("GPIO26", vec![Level::Low, Level::High])
            .fail_when_exhausted();
        let (sink, attempts) = ScriptedSink::new(vec![200]);

        let harness = spawn_pipeline(line, sink, Duration::from_millis(1), None);

        let result = harness.poller.await.unwrap();
        assert!(matches!(result, Err(ShutterError::LineRead { .. })));

        // The frame captured before the failure still drains.
        timeout(Duration::from_secs(2), harness.worker)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*attempts.lock().unwrap(), vec![(1, Some(200))]);
    }
}
