//! Error types.
//!
//! Remote failures are not errors here: they come back as a failed [`crate::Status`].
//! These variants cover misconfiguration that must stop the run before any request is made.

use thiserror::Error;

/// Errors that abort a reconciliation before it starts.
#[derive(Debug, Error)]
pub enum Error {
    /// Field not present in the resource catalog.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Required field absent from the desired configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Value has the wrong type for its field.
    #[error("invalid type for {field}: expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// Value outside the allowed set.
    #[error("value of {field} must be one of: {allowed}, got {got}")]
    InvalidChoice {
        field: String,
        allowed: String,
        got: String,
    },

    /// `state` is neither `present` nor `absent`.
    #[error("invalid state: {0} (expected present or absent)")]
    InvalidState(String),

    /// Client could not be constructed.
    #[error("invalid client configuration: {0}")]
    Client(String),
}

/// Result type for cakesync operations.
pub type Result<T> = std::result::Result<T, Error>;
