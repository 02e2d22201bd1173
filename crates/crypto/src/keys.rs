//! Signing secrets and key fingerprints.

use crate::signing::SigningError;
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum HMAC secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const FINGERPRINT_CONTEXT: &str = "rollcall 2026-01 signing key fingerprint";

/// Shared secret for keyed token signatures.
///
/// The bytes are zeroized when the secret is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Generate a fresh 32-byte secret from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; MIN_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SigningError> {
        if bytes.len() < MIN_SECRET_LEN {
            let len = bytes.len();
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(SigningError::KeyTooShort {
                len,
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(encoded: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(encoded.trim()).map_err(|e| SigningError::Encoding {
            reason: format!("signing secret is not valid hex: {}", e),
        })?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&format_args!("<{} bytes redacted>", self.0.len()))
            .finish()
    }
}

/// Stable, non-reversible identifier for key material, safe to log.
///
/// First 8 bytes of a BLAKE3 key derivation over the key bytes, hex encoded.
pub fn key_fingerprint(key_material: &[u8]) -> String {
    let derived = blake3::derive_key(FINGERPRINT_CONTEXT, key_material);
    hex::encode(&derived[..8])
}
