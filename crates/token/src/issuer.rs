//! Token issuance.
//!
//! The issuer stamps a token with the current time, a fixed validity window
//! and a session id that is unique per issuance, then signs it.

use crate::error::{TokenError, TokenResult};
use crate::token::{generate_signature, AttendanceToken, Location, SignedFields};
use rollcall_core::{Clock, IssuanceConfig, SystemClock, DEFAULT_VALIDITY_WINDOW_MS};
use rollcall_crypto::TokenSigner;
use tracing::debug;
use uuid::Uuid;

/// Mints signed attendance tokens.
pub struct TokenIssuer<S: TokenSigner> {
    signer: S,
    token_type: String,
    validity_window_ms: u64,
    clock: Box<dyn Clock>,
}

impl<S: TokenSigner> TokenIssuer<S> {
    /// Issuer with the default token type, 5 minute window and system clock.
    pub fn new(signer: S) -> Self {
        Self {
            signer,
            token_type: crate::ATTENDANCE_TOKEN_TYPE.to_string(),
            validity_window_ms: DEFAULT_VALIDITY_WINDOW_MS,
            clock: Box::new(SystemClock),
        }
    }

    pub fn from_config(signer: S, config: &IssuanceConfig) -> TokenResult<Self> {
        Self::new(signer)
            .with_token_type(&config.token_type)?
            .with_validity_window(config.validity_window_ms)
    }

    pub fn with_validity_window(mut self, validity_window_ms: u64) -> TokenResult<Self> {
        if validity_window_ms == 0 {
            return Err(TokenError::InvalidWindow(
                "validity window must be greater than zero".to_string(),
            ));
        }
        self.validity_window_ms = validity_window_ms;
        Ok(self)
    }

    pub fn with_token_type(mut self, token_type: &str) -> TokenResult<Self> {
        if token_type.trim().is_empty() {
            return Err(TokenError::invalid_field("type", "must not be empty"));
        }
        self.token_type = token_type.to_string();
        Ok(self)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn validity_window_ms(&self) -> u64 {
        self.validity_window_ms
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Issue a token stamped with the issuer's clock.
    pub fn issue(
        &self,
        course_id: &str,
        instructor_id: &str,
        location: Option<Location>,
    ) -> TokenResult<AttendanceToken> {
        self.issue_at(self.clock.now_ms(), course_id, instructor_id, location)
    }

    /// Issue a token stamped at `now_ms`.
    pub fn issue_at(
        &self,
        now_ms: u64,
        course_id: &str,
        instructor_id: &str,
        location: Option<Location>,
    ) -> TokenResult<AttendanceToken> {
        if course_id.trim().is_empty() {
            return Err(TokenError::invalid_field("courseId", "must not be empty"));
        }
        if instructor_id.trim().is_empty() {
            return Err(TokenError::invalid_field(
                "instructorId",
                "must not be empty",
            ));
        }
        if let Some(location) = &location {
            location.validate()?;
        }

        let expires_at = now_ms.checked_add(self.validity_window_ms).ok_or_else(|| {
            TokenError::InvalidWindow(format!(
                "timestamp {} plus window {} overflows",
                now_ms, self.validity_window_ms
            ))
        })?;
        let session_id = new_session_id(now_ms);

        let signature = generate_signature(
            &self.signer,
            &SignedFields {
                token_type: &self.token_type,
                course_id,
                timestamp: now_ms,
                expires_at,
                instructor_id,
                session_id: &session_id,
            },
        );

        debug!(
            course_id,
            session_id = %session_id,
            expires_at,
            key_id = self.signer.key_id(),
            "Issued attendance token"
        );

        Ok(AttendanceToken {
            token_type: self.token_type.clone(),
            course_id: course_id.to_string(),
            session_id,
            instructor_id: instructor_id.to_string(),
            timestamp: now_ms,
            expires_at,
            location,
            signature,
        })
    }
}

/// `session-<timestamp>-<random>`: unique even for issuances in the same millisecond.
fn new_session_id(timestamp: u64) -> String {
    format!("session-{}-{}", timestamp, Uuid::new_v4().simple())
}
