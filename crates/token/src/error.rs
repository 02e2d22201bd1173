//! Error types for attendance token operations.

use rollcall_core::CoreError;
use rollcall_crypto::SigningError;
use thiserror::Error;

/// Errors that can occur while issuing or decoding attendance tokens.
///
/// Failed checks (bad signature, expired, out of range) are not errors; they
/// are reported as `false` or as a rejected verdict.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A field is empty or out of range
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The validity window cannot produce `expires_at > timestamp`
    #[error("Invalid validity window: {0}")]
    InvalidWindow(String),

    /// QR payload could not be decoded
    #[error("Invalid QR payload: {0}")]
    Payload(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Signer or verifier construction failed
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Core errors
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl TokenError {
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;
