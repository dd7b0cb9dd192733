//! HTTP client capability used by the fetch unit.
//!
//! [`HttpClient`] is the seam between the scheduler and the network: the
//! production implementation wraps `reqwest`, tests plug in fakes that
//! answer from memory.

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{Client, ClientBuilder, Request, StatusCode};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::{debug, instrument};

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::{DownloadError, EngineError};

/// Response body handed from the client to the saver.
pub type BodyReader = Box<dyn AsyncRead + Send + Unpin>;

/// Status and streaming body of an HTTP response.
pub struct HttpResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Body, read lazily by the saver.
    pub body: BodyReader,
}

impl HttpResponse {
    /// Builds a response from any body reader.
    pub fn new(status: StatusCode, body: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Executes prepared HTTP requests.
///
/// Held by the engine as `Arc<dyn HttpClient>`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the response head with a streaming body.
    ///
    /// Status codes are not interpreted here; the caller decides what counts
    /// as success.
    async fn execute(&self, request: Request) -> Result<HttpResponse, DownloadError>;
}

/// Production [`HttpClient`] backed by a pooled `reqwest::Client`.
///
/// Create it once and share it: connections are reused across downloads.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Creates a client with the default connect timeout.
    ///
    /// There is no read timeout at this level: every download is bounded by
    /// the engine's per-task deadline instead.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HttpClient`] if the TLS backend or system
    /// configuration cannot be initialised.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    }

    /// Creates a client with an explicit connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HttpClient`] if the client cannot be built.
    #[instrument(level = "debug")]
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self, EngineError> {
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout)
            .build()?;
        debug!("built HTTP client");
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: Request) -> Result<HttpResponse, DownloadError> {
        let url = request.url().to_string();
        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(&url)
            } else {
                DownloadError::network(&url, e)
            }
        })?;

        let status = response.status();
        let stream = Box::pin(response.bytes_stream().map_err(io::Error::other));
        Ok(HttpResponse::new(status, StreamReader::new(stream)))
    }
}
