//! Remote task service error types.
//!
//! Every [`TaskService`](crate::service::TaskService) call surfaces failures
//! through [`ServiceError`].  The kernel's public operations never return
//! these to callers; they are logged and folded into absent/`false` results.

/// Failure of a call to the remote task service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("transport error during `{operation}`: {reason}")]
    Transport { operation: String, reason: String },

    /// The service rejected the credential.
    #[error("unauthorized during `{operation}` (status {status})")]
    Unauthorized { operation: String, status: u16 },

    /// The service is throttling requests.
    #[error("rate limited during `{operation}` (retry after {retry_after:?}s)")]
    RateLimited {
        operation: String,
        retry_after: Option<u64>,
    },

    /// The addressed entity does not exist remotely.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Any other non-success HTTP status.
    #[error("`{operation}` failed with status {status}: {message}")]
    Http {
        operation: String,
        status: u16,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode `{operation}` response: {reason}")]
    Decode { operation: String, reason: String },

    /// A paginated listing handed out a cursor it had already returned.
    #[error("pagination cursor `{cursor}` did not advance")]
    StalledCursor { cursor: String },
}

/// Convenience alias used throughout the kernel crate.
pub type Result<T> = std::result::Result<T, ServiceError>;
