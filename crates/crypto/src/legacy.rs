//! Legacy reversible signature transform.
//!
//! Codes printed by the first generation of the mobile app carry a
//! "signature" that is the concatenated field strings
//! (`type courseId timestamp expiresAt instructorId sessionId`, no
//! separators) reversed and base64 encoded. It binds nothing to a secret:
//! anyone who can read a code can mint a new one. It is kept so those codes
//! can still be recognised during migration, and must never be used to
//! issue new tokens in production.

use crate::signing::{MessageEncoding, TokenSigner, TokenVerifier};
use base64::{engine::general_purpose::STANDARD, Engine};

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySigner;

/// Reverse by character so multi-byte field values stay valid UTF-8.
fn reverse_message(message: &[u8]) -> Vec<u8> {
    match std::str::from_utf8(message) {
        Ok(text) => text.chars().rev().collect::<String>().into_bytes(),
        Err(_) => message.iter().rev().copied().collect(),
    }
}

impl TokenSigner for LegacySigner {
    fn sign(&self, message: &[u8]) -> String {
        STANDARD.encode(reverse_message(message))
    }

    fn key_id(&self) -> &str {
        "legacy-reversed"
    }

    fn message_encoding(&self) -> MessageEncoding {
        MessageEncoding::Concatenated
    }
}

impl TokenVerifier for LegacySigner {
    fn verify(&self, message: &[u8], signature: &str) -> bool {
        self.sign(message) == signature
    }

    fn message_encoding(&self) -> MessageEncoding {
        MessageEncoding::Concatenated
    }
}
