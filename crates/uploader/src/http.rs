//! HttpSink - POST captured frames to the collection endpoint

use std::time::Duration;

use contracts::{ImageFrame, ShutterError, UploadSink};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

/// Header carrying the shared device secret.
const SECRET_HEADER: &str = "X-Raspi-Secret";

/// Configuration for HttpSink
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Upload endpoint (scheme + authority + path)
    pub endpoint: String,
    /// Shared secret sent with every request
    pub secret: String,
    /// Per-request timeout (None = unbounded)
    pub request_timeout: Option<Duration>,
}

/// Give a bare `host:port` endpoint an http scheme.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

/// Sink that uploads frames over HTTP.
///
/// One `POST <endpoint>` per frame: `Content-Type: image/jpeg`, the
/// shared secret header, raw JPEG bytes as the body. The response status
/// is reported; the response body is never read.
pub struct HttpSink {
    name: String,
    config: HttpSinkConfig,
    client: Client,
}

impl HttpSink {
    /// Create a new HttpSink
    #[instrument(name = "http_sink_new", skip(name, config))]
    pub fn new(name: impl Into<String>, config: HttpSinkConfig) -> Result<Self, ShutterError> {
        let name = name.into();

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ShutterError::upload(&config.endpoint, e.to_string()))?;

        debug!(sink = %name, endpoint = %config.endpoint, "HttpSink ready");
        Ok(Self {
            name,
            config,
            client,
        })
    }
}

impl UploadSink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_sink_send",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    async fn send(&mut self, frame: &ImageFrame) -> Result<u16, ShutterError> {
        debug!(sink = %self.name, frame_id = frame.frame_id, "sending request");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "image/jpeg")
            .header(SECRET_HEADER, self.config.secret.as_str())
            .body(frame.jpeg.clone())
            .send()
            .await
            .map_err(|e| ShutterError::upload(&self.config.endpoint, e.to_string()))?;

        Ok(response.status().as_u16())
    }
}
