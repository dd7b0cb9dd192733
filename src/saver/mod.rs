//! Persistence sinks for downloaded bodies.
//!
//! The fetch unit hands every successful response to a [`Saver`] exactly
//! once. [`FileSaver`] is the production sink; tests substitute in-memory
//! ones.

mod error;
mod fs;

use async_trait::async_trait;

pub use error::SaveError;
pub use fs::FileSaver;

use crate::download::BodyReader;

/// Stores a named byte stream.
#[async_trait]
pub trait Saver: Send + Sync {
    /// Consumes `body` and stores it under `name`, returning the byte count.
    ///
    /// Implementations must overwrite any earlier content stored under the
    /// same name, so repeated runs converge to the same result.
    async fn save(&self, name: &str, body: &mut BodyReader) -> Result<u64, SaveError>;
}
