//! Error types for the snapdiff library
//!
//! This module defines all error types that can occur while scanning
//! snapshots, matching them and materializing the results. Errors carry
//! enough context to point at the offending record or path.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the snapdiff library
pub type Result<T> = std::result::Result<T, SnapdiffError>;

/// Main error type for all snapdiff operations
#[derive(Debug, Error)]
pub enum SnapdiffError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Walk error from the ignore crate
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// A file record violates the matcher's input contract
    #[error("Invalid file record ({side} index {index}): {reason}")]
    InvalidRecord {
        /// Which snapshot the record came from ("lhs" or "rhs")
        side: &'static str,
        /// Position of the record in its snapshot
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Copying a matched file into the output tree failed
    #[error("Copy failed: {src:?} -> {dest:?}")]
    Copy {
        /// Source path of the copy
        src: PathBuf,
        /// Destination path of the copy
        dest: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Exclude pattern could not be parsed
    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(String),

    /// A snapshot argument does not point at a directory
    #[error("{label} snapshot is not a directory: {path}")]
    NotADirectory {
        /// Which snapshot argument was wrong ("Left" or "Right")
        label: &'static str,
        /// The path the caller supplied
        path: String,
    },

    /// Path could not be represented as UTF-8
    #[error("Path conversion error: {0:?}")]
    PathConversion(std::ffi::OsString),

    /// Thread pool error
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SnapdiffError {
    /// Create an invalid-record error for a record at `index` of `side`
    pub fn invalid_record(side: &'static str, index: usize, reason: impl Into<String>) -> Self {
        SnapdiffError::InvalidRecord {
            side,
            index,
            reason: reason.into(),
        }
    }

    /// Create a copy error wrapping the underlying I/O failure
    pub fn copy(src: impl Into<PathBuf>, dest: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapdiffError::Copy {
            src: src.into(),
            dest: dest.into(),
            source,
        }
    }

    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        SnapdiffError::Internal(msg.into())
    }

    /// Create a not-a-directory error for a snapshot argument
    pub fn not_a_directory(label: &'static str, path: impl Into<String>) -> Self {
        SnapdiffError::NotADirectory {
            label,
            path: path.into(),
        }
    }

    /// Check if this error is a violation of the caller-facing input contract
    /// rather than an environmental failure
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SnapdiffError::InvalidRecord { .. }
                | SnapdiffError::InvalidPattern(_)
                | SnapdiffError::NotADirectory { .. }
        )
    }
}
