//! Attendance token model, canonical signing bytes and QR payload codec.
//!
//! A token is minted once by an issuer, rendered as a QR code, and judged by
//! any number of scanners until it expires. It is never mutated after
//! issuance.
//!
//! # Wire shape
//!
//! ```json
//! {
//!   "type": "attendance",
//!   "courseId": "CS101",
//!   "sessionId": "session-1760000000000-…",
//!   "instructorId": "instr-1",
//!   "timestamp": 1760000000000,
//!   "expiresAt": 1760000300000,
//!   "location": { "latitude": -1.2921, "longitude": 36.8219, "accuracy": 12.0 },
//!   "signature": "…"
//! }
//! ```

use crate::error::{TokenError, TokenResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rollcall_core::{now_ms, GeoCoordinate};
use rollcall_crypto::{MessageEncoding, TokenSigner, TokenVerifier};
use serde::{Deserialize, Serialize};

/// Type tag carried by every attendance token.
pub const ATTENDANCE_TOKEN_TYPE: &str = rollcall_core::DEFAULT_TOKEN_TYPE;

/// Version prefix of the canonical signing encoding.
const CANONICAL_VERSION: &[u8] = b"rollcall.token.v1";

/// Where the issuing device was when the token was minted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported GPS accuracy in meters. Informational only.
    #[serde(default)]
    pub accuracy: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }

    /// Validated coordinate for distance checks.
    pub fn coordinate(&self) -> rollcall_core::Result<GeoCoordinate> {
        GeoCoordinate::new(self.latitude, self.longitude)
    }

    pub(crate) fn validate(&self) -> TokenResult<()> {
        self.coordinate()
            .map_err(|e| TokenError::invalid_field("location", e.to_string()))?;
        if !self.accuracy.is_finite() || self.accuracy < 0.0 {
            return Err(TokenError::invalid_field(
                "location.accuracy",
                format!("must be a non-negative number of meters, got {}", self.accuracy),
            ));
        }
        Ok(())
    }
}

/// The signed payload embedded in an attendance QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceToken {
    #[serde(rename = "type")]
    pub token_type: String,
    pub course_id: String,
    pub session_id: String,
    pub instructor_id: String,
    /// Issuance time, Unix milliseconds
    pub timestamp: u64,
    /// Expiry time, Unix milliseconds
    pub expires_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub signature: String,
}

/// The token fields covered by the signature. Location is not signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedFields<'a> {
    pub token_type: &'a str,
    pub course_id: &'a str,
    pub timestamp: u64,
    pub expires_at: u64,
    pub instructor_id: &'a str,
    pub session_id: &'a str,
}

impl SignedFields<'_> {
    /// Unambiguous, order-sensitive byte encoding fed to signers.
    ///
    /// Strings are length-prefixed so that no two distinct field tuples share
    /// an encoding.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            64 + self.token_type.len()
                + self.course_id.len()
                + self.instructor_id.len()
                + self.session_id.len(),
        );
        put_str(&mut out, CANONICAL_VERSION);
        put_str(&mut out, self.token_type.as_bytes());
        put_str(&mut out, self.course_id.as_bytes());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.expires_at.to_be_bytes());
        put_str(&mut out, self.instructor_id.as_bytes());
        put_str(&mut out, self.session_id.as_bytes());
        out
    }

    /// Field values joined with no separators, the layout of first
    /// generation codes. Ambiguous at field boundaries.
    pub fn concatenated_bytes(&self) -> Vec<u8> {
        format!(
            "{}{}{}{}{}{}",
            self.token_type,
            self.course_id,
            self.timestamp,
            self.expires_at,
            self.instructor_id,
            self.session_id
        )
        .into_bytes()
    }

    pub fn encode(&self, encoding: MessageEncoding) -> Vec<u8> {
        match encoding {
            MessageEncoding::Canonical => self.canonical_bytes(),
            MessageEncoding::Concatenated => self.concatenated_bytes(),
        }
    }
}

fn put_str(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// Compute the signature for a set of token fields.
pub fn generate_signature<S>(signer: &S, fields: &SignedFields<'_>) -> String
where
    S: TokenSigner + ?Sized,
{
    signer.sign(&fields.encode(signer.message_encoding()))
}

/// Whether the token's signature matches its own signed fields.
pub fn validate_signature<V>(verifier: &V, token: &AttendanceToken) -> bool
where
    V: TokenVerifier + ?Sized,
{
    let message = token.signed_fields().encode(verifier.message_encoding());
    verifier.verify(&message, &token.signature)
}

impl AttendanceToken {
    pub fn signed_fields(&self) -> SignedFields<'_> {
        SignedFields {
            token_type: &self.token_type,
            course_id: &self.course_id,
            timestamp: self.timestamp,
            expires_at: self.expires_at,
            instructor_id: &self.instructor_id,
            session_id: &self.session_id,
        }
    }

    /// Whether `now_ms` falls inside `[timestamp, expires_at]`.
    pub fn is_time_valid_at(&self, now_ms: u64) -> bool {
        now_ms >= self.timestamp && now_ms <= self.expires_at
    }

    /// Time validity against the wall clock.
    pub fn is_time_valid(&self) -> bool {
        self.is_time_valid_at(now_ms())
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    /// Milliseconds left before expiry, zero once expired.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }

    /// Structural checks a decoded token must pass before it is judged.
    pub fn check_shape(&self) -> TokenResult<()> {
        if self.token_type.trim().is_empty() {
            return Err(TokenError::invalid_field("type", "must not be empty"));
        }
        if self.course_id.trim().is_empty() {
            return Err(TokenError::invalid_field("courseId", "must not be empty"));
        }
        if self.session_id.trim().is_empty() {
            return Err(TokenError::invalid_field("sessionId", "must not be empty"));
        }
        if self.instructor_id.trim().is_empty() {
            return Err(TokenError::invalid_field(
                "instructorId",
                "must not be empty",
            ));
        }
        if self.expires_at <= self.timestamp {
            return Err(TokenError::InvalidWindow(format!(
                "expiresAt ({}) must be after timestamp ({})",
                self.expires_at, self.timestamp
            )));
        }
        if let Some(location) = &self.location {
            location.validate()?;
        }
        Ok(())
    }

    /// Encode as the string rendered into the QR code.
    pub fn to_qr_payload(&self) -> TokenResult<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a scanned QR string and check its shape.
    pub fn from_qr_payload(payload: &str) -> TokenResult<Self> {
        let json = URL_SAFE_NO_PAD
            .decode(payload.trim())
            .map_err(|e| TokenError::Payload(e.to_string()))?;
        let token: AttendanceToken = serde_json::from_slice(&json)?;
        token.check_shape()?;
        Ok(token)
    }
}
