//! Error types for dependency log persistence.

use std::path::PathBuf;

use tlog_common::PathError;

/// Errors that can occur while loading or saving the dependency logs.
///
/// Only persistence fails loudly. Staleness checks never return an error;
/// a log that cannot be read simply means the target must be rebuilt.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing a log file.
    #[error("tlog I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A fully written temporary file could not be moved over the log.
    #[error("failed to replace {path}: {source}")]
    Persist {
        /// The log file that was being replaced.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// No base directory was available to resolve relative paths.
    #[error(transparent)]
    BaseDir(#[from] PathError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io { path, source }
    }
}
