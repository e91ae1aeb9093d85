//! Error types for the Outgoing Caller IDs client.
//!
//! # Design
//! Local precondition failures (`MissingArgument`, `OutOfRange`) are raised
//! before any request is built, so they never leave side effects behind.
//! Provider responses map onto `Validation`, `NotFound` and `HttpError`,
//! each carrying the raw status and body untouched. `Transport` is reserved
//! for executors that could not complete the exchange at all.

use thiserror::Error;

/// Errors returned by `CallerIdClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was absent or empty. Carries the provider-facing
    /// parameter name, e.g. `PhoneNumber`.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// A numeric or length constraint was violated locally.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The provider rejected the request parameters (400 or 422).
    #[error("rejected by provider (HTTP {status}): {body}")]
    Validation { status: u16, body: String },

    /// The provider returned 404.
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The executor failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    /// True for errors detected locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, ApiError::MissingArgument(_) | ApiError::OutOfRange { .. })
    }
}
