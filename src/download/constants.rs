//! Constants for the download module (concurrency and timeouts).

use std::time::Duration;

/// Default number of downloads allowed in flight at once.
pub const DEFAULT_THREADS: usize = 4;

/// Default per-download deadline, covering request, response and saving.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP connect timeout for the production client (seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;
