//! Adapter error types.
//!
//! The Telegram and OpenAI clients surface errors through [`AdapterError`].
//! The Todoist client implements the kernel's `TaskService` and reports
//! through `ServiceError` instead.

/// Unified error type for todobot adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The adapter requires a credential that has not been configured.
    #[error("authentication required: provider={provider}")]
    AuthRequired { provider: String },

    /// The request never produced a response.
    #[error("request to `{method}` failed: {reason}")]
    Request { method: String, reason: String },

    /// The remote API answered with a non-success status.
    #[error("`{method}` returned status {status}: {message}")]
    Http {
        method: String,
        status: u16,
        message: String,
    },

    /// The Telegram Bot API reported `ok: false`.
    #[error("Telegram API error in `{method}` (code {error_code}): {description}")]
    Telegram {
        method: String,
        error_code: i64,
        description: String,
    },

    /// A response arrived but did not have the expected shape.
    #[error("unexpected response from `{method}`: {reason}")]
    UnexpectedResponse { method: String, reason: String },

    /// An operation exceeded its time limit.
    #[error("timeout after {seconds}s: {reason}")]
    Timeout { seconds: u64, reason: String },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, AdapterError>;
