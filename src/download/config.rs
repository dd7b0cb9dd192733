//! Engine configuration: thread budget, per-download timeout and User-Agent.

use std::time::Duration;

use super::EngineError;
use super::constants::{DEFAULT_THREADS, DEFAULT_TIMEOUT};
use crate::user_agent::default_user_agent;

/// Settings shared by the scheduler and every fetch it launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of downloads in flight at once.
    pub threads: usize,
    /// Deadline for a single download, from request to durable save.
    pub timeout: Duration,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl EngineConfig {
    /// Returns this config with the given thread budget.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Returns this config with the given per-download timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns this config with the given User-Agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks the invariants the scheduler relies on.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidThreads`] when `threads` is zero and
    /// [`EngineError::InvalidTimeout`] when `timeout` is zero.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.threads < 1 {
            return Err(EngineError::InvalidThreads {
                value: self.threads,
            });
        }
        if self.timeout.is_zero() {
            return Err(EngineError::InvalidTimeout);
        }
        Ok(())
    }
}
