//! # Store Error Types
//!
//! Errors on the snapshot write path.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the path that failed                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError / warning field (in web app)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The read path reports through `vend_core::LoadError` instead, which is
//! always recoverable.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Snapshot write errors.
///
/// The in-memory machine is never affected by one of these.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system operation failed.
    ///
    /// ## When This Occurs
    /// - Data directory can't be created
    /// - Disk full or read-only mount
    /// - Rename over the destination refused
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot could not be encoded.
    #[error("Could not encode snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No platform data directory could be determined.
    #[error("Could not determine data directory")]
    NoDataDir,
}

impl StoreError {
    /// Wraps an I/O error with the path it happened at.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
