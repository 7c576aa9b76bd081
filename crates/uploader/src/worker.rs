//! Upload worker - drains the frame channel into a sink

use std::sync::Arc;

use async_channel::Receiver;
use contracts::{ImageFrame, ShutdownToken, UploadSink};
use tracing::{debug, info, warn};

use crate::metrics::UploadMetrics;

/// Drain the channel until it closes or the token fires.
///
/// Frames already queued are uploaded before the token is honored; the
/// token is observed whenever the worker would otherwise wait on an empty
/// channel, so cancellation never blocks. Frames arrive and are uploaded
/// in enqueue order; a failed upload for one frame never blocks the next.
pub async fn drain<S: UploadSink>(
    mut sink: S,
    rx: Receiver<ImageFrame>,
    token: ShutdownToken,
    metrics: Arc<UploadMetrics>,
) {
    debug!(sink = %sink.name(), "upload worker started");

    loop {
        let frame = tokio::select! {
            biased;
            received = rx.recv() => match received {
                Ok(frame) => frame,
                Err(_) => {
                    debug!(sink = %sink.name(), "frame channel closed and drained");
                    break;
                }
            },
            _ = token.requested() => {
                debug!(sink = %sink.name(), "upload worker observed shutdown");
                break;
            }
        };

        metrics.set_queue_len(rx.len());
        let frame_id = frame.frame_id;
        let bytes = frame.len();

        match sink.send(&frame).await {
            Ok(status) if (200..300).contains(&status) => {
                metrics.inc_uploaded();
                info!(sink = %sink.name(), frame_id, status, bytes, "image uploaded");
            }
            Ok(status) => {
                metrics.inc_failed();
                warn!(sink = %sink.name(), frame_id, status, "upload rejected");
            }
            Err(e) => {
                metrics.inc_failed();
                warn!(sink = %sink.name(), frame_id, error = %e, "upload failed");
            }
        }
    }

    debug!(
        sink = %sink.name(),
        uploaded = metrics.uploaded(),
        failed = metrics.failed(),
        "upload worker stopped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use capture::frame_channel;
    use contracts::ShutterError;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Scripted sink: answers each send from a list of outcomes and
    /// records the frame order it saw.
    struct ScriptedSink {
        outcomes: Vec<Result<u16, ShutterError>>,
        seen: Arc<Mutex<Vec<u64>>>,
        sends: usize,
    }

    impl ScriptedSink {
        fn new(outcomes: Vec<Result<u16, ShutterError>>) -> (Self, Arc<Mutex<Vec<u64>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    outcomes,
                    seen: seen.clone(),
                    sends: 0,
                },
                seen,
            )
        }
    }

    impl UploadSink for ScriptedSink {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&mut self, frame: &ImageFrame) -> Result<u16, ShutterError> {
            self.seen.lock().unwrap().push(frame.frame_id);
            let outcome = if self.sends < self.outcomes.len() {
                match &self.outcomes[self.sends] {
                    Ok(status) => Ok(*status),
                    Err(_) => Err(ShutterError::upload("scripted", "injected failure")),
                }
            } else {
                Ok(200)
            };
            self.sends += 1;
            outcome
        }
    }

    fn frame(id: u64) -> ImageFrame {
        ImageFrame::new(id, Bytes::from_static(b"\xff\xd8\xff\xd9"))
    }

    #[tokio::test]
    async fn frames_are_uploaded_in_fifo_order() {
        let (tx, rx) = frame_channel(10);
        let (sink, seen) = ScriptedSink::new(vec![]);
        let metrics = Arc::new(UploadMetrics::new());

        for id in 1..=5 {
            tx.send(frame(id)).await.unwrap();
        }
        drop(tx);

        drain(sink, rx, ShutdownToken::new(), metrics.clone()).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(metrics.uploaded(), 5);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_next_upload() {
        let (tx, rx) = frame_channel(10);
        let (sink, seen) = ScriptedSink::new(vec![
            Err(ShutterError::upload("scripted", "down")),
            Ok(200),
        ]);
        let metrics = Arc::new(UploadMetrics::new());

        tx.send(frame(1)).await.unwrap();
        tx.send(frame(2)).await.unwrap();
        drop(tx);

        drain(sink, rx, ShutdownToken::new(), metrics.clone()).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(metrics.failed(), 1);
        assert_eq!(metrics.uploaded(), 1);
    }

    #[tokio::test]
    async fn non_success_status_counts_as_failure_but_continues() {
        let (tx, rx) = frame_channel(10);
        let (sink, seen) = ScriptedSink::new(vec![Ok(401), Ok(204)]);
        let metrics = Arc::new(UploadMetrics::new());

        tx.send(frame(1)).await.unwrap();
        tx.send(frame(2)).await.unwrap();
        drop(tx);

        drain(sink, rx, ShutdownToken::new(), metrics.clone()).await;

        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(metrics.failed(), 1);
        assert_eq!(metrics.uploaded(), 1);
    }

    #[tokio::test]
    async fn token_stops_a_worker_waiting_on_an_empty_channel() {
        let (tx, rx) = frame_channel(10);
        let (sink, _seen) = ScriptedSink::new(vec![]);
        let metrics = Arc::new(UploadMetrics::new());
        let token = ShutdownToken::new();

        let worker = tokio::spawn(drain(sink, rx, token.clone(), metrics));

        token.request();
        timeout(Duration::from_secs(1), worker)
            .await
            .expect("worker did not observe the token")
            .unwrap();
        drop(tx);
    }
}
