//! Bounded concurrent HTTP downloads.
//!
//! This module turns a list of links into saved files:
//!
//! - [`DownloadEngine`] admits links into a fixed number of concurrent slots
//!   and waits for all of them
//! - [`fetch_link`] performs one `GET` under a deadline and hands the body to
//!   a [`Saver`](crate::saver::Saver)
//! - [`file_name_for_url`] derives the local name for a link
//! - [`HttpClient`] is the injectable transport, [`ReqwestClient`] the
//!   production one
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dwl_core::download::{DownloadEngine, EngineConfig, ReqwestClient};
//! use dwl_core::saver::FileSaver;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(ReqwestClient::new()?),
//!     Arc::new(FileSaver::new("./downloads")),
//! )?;
//! let links = vec![
//!     "https://example.com/".to_string(),
//!     "https://example.com/archive.zip".to_string(),
//! ];
//! engine.download(&links, &CancellationToken::new()).await;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod constants;
mod engine;
mod error;
mod fetch;
mod filename;

pub use client::{BodyReader, HttpClient, HttpResponse, ReqwestClient};
pub use config::EngineConfig;
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_THREADS, DEFAULT_TIMEOUT};
pub use engine::DownloadEngine;
pub use error::{DownloadError, EngineError, TransportError};
pub use fetch::{SavedFile, build_request, fetch_link};
pub use filename::{INDEX_FILE_NAME, file_name_for_url};
