//! Error types for the persistence layer.
//!
//! Content problems (missing files, malformed lines, unknown keys) are never
//! errors; they are counted in load reports. Only I/O failures surface here.

use std::path::PathBuf;

/// Errors that can occur while reading or writing snapshot files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading a snapshot file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing or replacing a snapshot file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
