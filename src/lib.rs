//! dwl core library
//!
//! Bulk file downloading: fetch a list of links over HTTP(S) with a bounded
//! number of downloads in flight, a per-download deadline and a shared
//! cancellation token, and store each body as a local file.
//!
//! # Architecture
//!
//! - [`download`] - scheduler, fetch unit, file naming and HTTP transport
//! - [`saver`] - persistence sinks for downloaded bodies

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod saver;
mod user_agent;

// Re-export commonly used types
pub use download::{
    DEFAULT_THREADS, DEFAULT_TIMEOUT, DownloadEngine, DownloadError, EngineConfig, EngineError,
    HttpClient, ReqwestClient,
};
pub use saver::{FileSaver, SaveError, Saver};
pub use user_agent::default_user_agent;
