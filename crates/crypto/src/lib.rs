//! Signature schemes for Rollcall attendance tokens.
//!
//! An attendance token carries a signature over its identity and time fields
//! so that a scanner can detect tampering. This crate provides the signing
//! primitives behind that check; it knows nothing about token structure and
//! operates on message bytes prepared by the token crate in the
//! [`MessageEncoding`] each scheme asks for.
//!
//! # Supported Schemes
//!
//! - **HMAC-SHA256** ([`HmacSigner`]): keyed MAC with a server-held secret.
//!   The default for issuance and validation.
//! - **Ed25519** ([`Ed25519TokenSigner`] / [`Ed25519TokenVerifier`]): lets
//!   scanners verify with the public key only.
//! - **Legacy** ([`LegacySigner`]): the reversible transform used by codes
//!   issued before keyed signing. Forgeable; verification only.
//!
//! # Security Principles
//!
//! - Secrets are zeroized on drop and never logged
//! - Keyed signatures are compared in constant time
//! - Verification never panics; any malformed signature is a mismatch

pub mod keys;
pub mod legacy;
pub mod signing;

#[cfg(test)]
mod test_vectors;

pub use keys::{key_fingerprint, SigningSecret, MIN_SECRET_LEN};
pub use legacy::LegacySigner;
pub use signing::{
    Ed25519TokenSigner, Ed25519TokenVerifier, HmacSigner, MessageEncoding, SigningError,
    TokenSigner, TokenVerifier,
};
