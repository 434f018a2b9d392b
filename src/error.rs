//! Error types for the preprocessing pipeline.
//!
//! Every error is fatal: the tool is a deterministic build step and is
//! re-run from scratch on failure, so there is no partial-success mode.

use std::path::PathBuf;
use thiserror::Error;

/// Errors during schema preprocessing.
#[derive(Debug, Error)]
pub enum PreprocessError {
    // IO errors (exit code 3)
    #[error("input directory not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    SerializeError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PreprocessError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } | Self::ReadError { .. } | Self::WriteError { .. } => 3,
            Self::InvalidJson { .. } | Self::SerializeError { .. } => 2,
        }
    }
}
