//! Error type for persistence sinks.

use std::path::PathBuf;

use thiserror::Error;

/// Errors a [`Saver`](super::Saver) can report.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The derived name cannot be used as a plain file name.
    #[error("invalid file name {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// File system error while creating, writing or syncing the file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SaveError {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
