//! Download engine: bounded concurrent fan-out over a list of links.
//!
//! The [`DownloadEngine`] admits links in input order into a fixed pool of
//! semaphore permits, runs one fetch task per admitted link, and waits for
//! every task before returning.
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
//!     EngineConfig::default().with_threads(8),
//!     Arc::new(ReqwestClient::new()?),
//!     Arc::new(FileSaver::new(".")),
//! )?;
//! let links = vec!["https://example.com/file.zip".to_string()];
//! engine.download(&links, &CancellationToken::new()).await;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::config::EngineConfig;
use super::error::EngineError;
use super::fetch::fetch_link;
use crate::saver::Saver;

/// Per-batch counters, only used for the summary log line.
#[derive(Debug, Default)]
struct BatchTally {
    saved: AtomicUsize,
    failed: AtomicUsize,
    cancelled: AtomicUsize,
}

impl BatchTally {
    fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn increment_saved(&self) {
        self.saved.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}

/// Bounded concurrent download scheduler.
///
/// # Concurrency Model
///
/// - Each download runs in its own Tokio task
/// - A semaphore permit is acquired before a task is spawned
/// - The permit moves into the task and is released when it exits (RAII),
///   whether it saved, failed, timed out, was cancelled or panicked
/// - `download` returns only after every spawned task has finished
///
/// # Failure Model
///
/// Every link is best-effort. Failures are logged with the link and never
/// stop the batch or surface from `download`.
///
/// # Cancellation
///
/// Once the token fires, no further links are admitted. Tasks already
/// running observe the same token and wind down on their own.
pub struct DownloadEngine {
    config: EngineConfig,
    client: Arc<dyn HttpClient>,
    saver: Arc<dyn Saver>,
}

impl fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidThreads`] if `config.threads` is zero and
    /// [`EngineError::InvalidTimeout`] if `config.timeout` is zero.
    #[instrument(level = "debug", skip(client, saver))]
    pub fn new(
        config: EngineConfig,
        client: Arc<dyn HttpClient>,
        saver: Arc<dyn Saver>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        debug!(
            threads = config.threads,
            timeout_ms = config.timeout.as_millis(),
            user_agent = %config.user_agent,
            "creating download engine"
        );

        Ok(Self {
            config,
            client,
            saver,
        })
    }

    /// Returns the configured thread budget.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.config.threads
    }

    /// Returns the configured per-download timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Returns the configured User-Agent.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    /// Downloads every link, at most `threads` at a time.
    ///
    /// Links are admitted in input order; completion order is unspecified.
    /// Returns once all admitted downloads have finished. If `cancel` fires
    /// (or is already set) admission stops and only the tasks already running
    /// are awaited.
    #[instrument(skip(self, links, cancel), fields(links = links.len(), threads = self.config.threads))]
    pub async fn download(&self, links: &[String], cancel: &CancellationToken) {
        let semaphore = Arc::new(Semaphore::new(self.config.threads));
        let tally = Arc::new(BatchTally::default());
        let mut handles = Vec::with_capacity(links.len());

        info!("starting downloads");

        for link in links {
            // Race the token against a free slot so a saturated pool does not
            // hold up shutdown.
            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(
                        admitted = handles.len(),
                        skipped = links.len() - handles.len(),
                        "cancelled, no further links admitted"
                    );
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("semaphore closed unexpectedly, no further links admitted");
                        break;
                    }
                },
            };

            debug!(link = %link, "admitted link");

            let link = link.clone();
            let client = Arc::clone(&self.client);
            let saver = Arc::clone(&self.saver);
            let config = self.config.clone();
            let cancel = cancel.clone();
            let tally = Arc::clone(&tally);

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                let result =
                    fetch_link(client.as_ref(), saver.as_ref(), &link, &config, &cancel).await;
                match result {
                    Ok(saved) => {
                        info!(
                            link = %saved.link,
                            name = %saved.name,
                            bytes = saved.bytes,
                            "downloaded"
                        );
                        tally.increment_saved();
                    }
                    Err(e) if e.is_cancelled() => {
                        debug!(link = %link, "download cancelled");
                        tally.increment_cancelled();
                    }
                    Err(e) => {
                        warn!(link = %link, error = %e, "download failed");
                        tally.increment_failed();
                    }
                }
            }));
        }

        let admitted = handles.len();
        debug!(task_count = admitted, "waiting for downloads to complete");

        for handle in handles {
            // Ignore JoinError - task panics are logged but don't fail the batch
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
                tally.increment_failed();
            }
        }

        info!(
            admitted,
            saved = tally.saved(),
            failed = tally.failed(),
            cancelled = tally.cancelled(),
            skipped = links.len() - admitted,
            "downloads finished"
        );
    }
}
