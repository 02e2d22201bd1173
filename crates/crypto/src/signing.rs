//! Token signing and verification.
//!
//! Signers turn canonical message bytes into an opaque signature string and
//! verifiers decide whether a presented string matches. Every scheme here is
//! deterministic: the same key and message always yield the same signature,
//! which is what lets a validator recompute and compare.
//!
//! # Security Model
//!
//! - HMAC secrets and Ed25519 private keys never leave the signer
//! - Signature strings are lowercase hex; anything else fails verification
//! - Verification is total: it returns `false` rather than an error

use crate::keys::{key_fingerprint, SigningSecret};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Hex length of an HMAC-SHA256 tag.
const HMAC_SIGNATURE_HEX_LEN: usize = 64;

/// Hex length of an Ed25519 signature.
const ED25519_SIGNATURE_HEX_LEN: usize = 128;

/// Errors that can occur while constructing signers and verifiers.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid key: {reason}")]
    InvalidKey { reason: String },

    #[error("Key too short: {len} bytes (minimum {min})")]
    KeyTooShort { len: usize, min: usize },

    #[error("Encoding error: {reason}")]
    Encoding { reason: String },
}

/// How the signed token fields are laid out before they reach a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageEncoding {
    /// Versioned, length-prefixed binary encoding.
    Canonical,
    /// Field values concatenated as plain strings, as printed by first
    /// generation codes.
    Concatenated,
}

/// Produces signatures over encoded token fields.
pub trait TokenSigner: Send + Sync {
    /// Sign `message`. Deterministic and infallible.
    fn sign(&self, message: &[u8]) -> String;

    /// Loggable identifier of the key in use.
    fn key_id(&self) -> &str;

    fn message_encoding(&self) -> MessageEncoding {
        MessageEncoding::Canonical
    }
}

/// Checks signatures over encoded token fields.
pub trait TokenVerifier: Send + Sync {
    /// Whether `signature` is the exact signature of `message`.
    fn verify(&self, message: &[u8], signature: &str) -> bool;

    fn message_encoding(&self) -> MessageEncoding {
        MessageEncoding::Canonical
    }
}

/// Decode a signature that must be exactly `expected_len` lowercase hex digits.
fn decode_lowercase_hex(signature: &str, expected_len: usize) -> Option<Vec<u8>> {
    if signature.len() != expected_len {
        return None;
    }
    if !signature
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return None;
    }
    hex::decode(signature).ok()
}

/// HMAC-SHA256 keyed with a server-held secret.
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha256,
    key_id: String,
}

impl HmacSigner {
    pub fn new(secret: &SigningSecret) -> Result<Self, SigningError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).map_err(|e| {
            SigningError::InvalidKey {
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            mac,
            key_id: format!("hmac-sha256:{}", key_fingerprint(secret.as_bytes())),
        })
    }

    pub fn from_hex(secret_hex: &str) -> Result<Self, SigningError> {
        Self::new(&SigningSecret::from_hex(secret_hex)?)
    }
}

impl TokenSigner for HmacSigner {
    fn sign(&self, message: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(message);
        hex::encode(mac.finalize().into_bytes())
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl TokenVerifier for HmacSigner {
    fn verify(&self, message: &[u8], signature: &str) -> bool {
        let Some(tag) = decode_lowercase_hex(signature, HMAC_SIGNATURE_HEX_LEN) else {
            tracing::debug!(key_id = %self.key_id, "Signature is not a well-formed HMAC tag");
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(message);
        mac.verify_slice(&tag).is_ok()
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Ed25519 signer for deployments where scanners should not hold the secret.
pub struct Ed25519TokenSigner {
    signing_key: SigningKey,
    key_id: String,
}

impl Ed25519TokenSigner {
    /// Creates a signer with a freshly generated key.
    ///
    /// For production use, keys should be loaded from secure storage.
    pub fn generate() -> Self {
        let mut secret_key_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut secret_key_bytes);
        let signing_key = SigningKey::from_bytes(&secret_key_bytes);
        secret_key_bytes.zeroize();

        Self::with_key(signing_key)
    }

    /// Creates a signer from a 32-byte private key.
    ///
    /// # Security
    /// The intermediate copy of the key bytes is zeroized.
    pub fn from_bytes(key_bytes: &[u8]) -> Result<Self, SigningError> {
        if key_bytes.len() != 32 {
            return Err(SigningError::InvalidKey {
                reason: format!("Invalid key length: {} (expected 32)", key_bytes.len()),
            });
        }

        let mut key_array = [0u8; 32];
        key_array.copy_from_slice(key_bytes);
        let signing_key = SigningKey::from_bytes(&key_array);
        key_array.zeroize();

        Ok(Self::with_key(signing_key))
    }

    fn with_key(signing_key: SigningKey) -> Self {
        let key_id = format!(
            "ed25519:{}",
            key_fingerprint(signing_key.verifying_key().as_bytes())
        );
        Self {
            signing_key,
            key_id,
        }
    }

    /// Public half, for distribution to scanners.
    pub fn verifier(&self) -> Ed25519TokenVerifier {
        Ed25519TokenVerifier {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl TokenSigner for Ed25519TokenSigner {
    fn sign(&self, message: &[u8]) -> String {
        hex::encode(self.signing_key.sign(message).to_bytes())
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl TokenVerifier for Ed25519TokenSigner {
    fn verify(&self, message: &[u8], signature: &str) -> bool {
        self.verifier().verify(message, signature)
    }
}

impl fmt::Debug for Ed25519TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519TokenSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Ed25519 public key for scanner-side verification.
#[derive(Debug, Clone)]
pub struct Ed25519TokenVerifier {
    verifying_key: VerifyingKey,
}

impl Ed25519TokenVerifier {
    pub fn from_bytes(public_key: &[u8]) -> Result<Self, SigningError> {
        let bytes: [u8; 32] = public_key.try_into().map_err(|_| SigningError::InvalidKey {
            reason: format!(
                "Invalid public key length: {} (expected 32)",
                public_key.len()
            ),
        })?;
        let verifying_key =
            VerifyingKey::from_bytes(&bytes).map_err(|e| SigningError::InvalidKey {
                reason: e.to_string(),
            })?;
        Ok(Self { verifying_key })
    }

    pub fn from_hex(public_key_hex: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(public_key_hex.trim()).map_err(|e| SigningError::Encoding {
            reason: format!("public key is not valid hex: {}", e),
        })?;
        Self::from_bytes(&bytes)
    }
}

impl TokenVerifier for Ed25519TokenVerifier {
    fn verify(&self, message: &[u8], signature: &str) -> bool {
        let Some(bytes) = decode_lowercase_hex(signature, ED25519_SIGNATURE_HEX_LEN) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            return false;
        };
        self.verifying_key.verify(message, &signature).is_ok()
    }
}
