//! Error types for the download module.
//!
//! [`DownloadError`] covers everything that can end a single fetch. None of
//! these are fatal for a batch: the engine logs them per link and moves on.
//! [`EngineError`] covers configuration problems detected before any
//! download starts.

use std::error::Error as StdError;

use thiserror::Error;

use crate::saver::SaveError;

/// Boxed transport error produced by an [`HttpClient`](super::HttpClient).
pub type TransportError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can end a single download task.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The link could not be turned into a request URL.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The link as given.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The configured User-Agent is not a valid header value.
    #[error("invalid User-Agent header for {url}")]
    InvalidHeader {
        /// The link the request was built for.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// The server answered with something other than `200 OK`.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an unexpected status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The per-task deadline expired.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The shared cancellation token fired before the task finished.
    #[error("download of {url} cancelled")]
    Cancelled {
        /// The URL whose download was abandoned.
        url: String,
    },

    /// The persistence sink rejected or failed to store the body.
    #[error("error saving {url}: {source}")]
    Save {
        /// The URL whose body could not be stored.
        url: String,
        /// The underlying sink error.
        #[source]
        source: SaveError,
    },
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(url: impl Into<String>) -> Self {
        Self::InvalidHeader { url: url.into() }
    }

    /// Creates a network error from any transport error.
    pub fn network(url: impl Into<String>, source: impl Into<TransportError>) -> Self {
        Self::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a cancellation error.
    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::Cancelled { url: url.into() }
    }

    /// Creates a save error.
    pub fn save(url: impl Into<String>, source: SaveError) -> Self {
        Self::Save {
            url: url.into(),
            source,
        }
    }

    /// Returns true if the task ended because the batch was cancelled.
    ///
    /// Cancellation is cooperative shutdown, not a failure, so the engine logs
    /// it at a lower level than the other variants.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Errors raised while configuring the engine, before any download starts.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Thread budget below one.
    #[error("invalid value for threads {value}: must be at least 1")]
    InvalidThreads {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Zero per-download timeout.
    #[error("invalid value for timeout: must be greater than zero")]
    InvalidTimeout,

    /// The production HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
