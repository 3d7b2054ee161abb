//! Intent crate error types.
//!
//! Mapping loading and task extraction surface errors through
//! [`IntentError`].  Classification itself cannot fail.

use std::path::PathBuf;

/// Unified error type for the intent crate.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    // -- Mapping errors ------------------------------------------------------
    /// The mapping file could not be read.
    #[error("failed to read mapping file {path}: {source}")]
    MappingIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mapping parsed but breaks a classification invariant.
    #[error("invalid mapping: {reason}")]
    InvalidMapping { reason: String },

    // -- Extraction errors ---------------------------------------------------
    /// The extractor's answer could not be turned into a task.
    #[error("failed to extract task: {reason}")]
    ExtractionFailed { reason: String },

    /// The extraction backend could not be reached or refused the request.
    #[error("extraction backend error: {0}")]
    Backend(String),

    // -- Serialization -------------------------------------------------------
    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
