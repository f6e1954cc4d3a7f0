//! HTTP access to the analysis backend.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderValue;
use srenity_protocol::ANALYZE_PATH;
use srenity_protocol::AnalyzeRequest;
use srenity_protocol::AnalyzeResponse;
use srenity_protocol::STREAM_PATH;

use crate::config::BackendConfig;
use crate::error::AnalysisError;
use crate::error::Result;

/// Response body of a streaming request, in arrival order.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Seam between the stream controller and the network.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Opens the long-lived streaming request. Resolves once response
    /// headers have arrived with a success status.
    async fn open_stream(&self, request: &AnalyzeRequest) -> Result<ByteStream>;

    /// Calls the one-shot companion endpoint.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    stream_url: url::Url,
    analyze_url: url::Url,
    request_timeout: std::time::Duration,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("srenity/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, config)
    }

    /// Creates a transport with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            client,
            stream_url: config.endpoint(STREAM_PATH)?,
            analyze_url: config.endpoint(ANALYZE_PATH)?,
            request_timeout: config.request_timeout(),
        })
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!("backend answered {status} for {}", response.url());
            Err(AnalysisError::Http {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn open_stream(&self, request: &AnalyzeRequest) -> Result<ByteStream> {
        let response = self
            .client
            .post(self.stream_url.clone())
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response)?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AnalysisError::Network))
            .boxed())
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse> {
        let response = self
            .client
            .post(self.analyze_url.clone())
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response)?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }
}
