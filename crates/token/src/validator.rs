//! Scanner-side token validation.
//!
//! Three independent gates decide a check-in: the signature matches the
//! token's own fields, the scan happens inside the token's time window, and
//! the scanning device is within the allowed radius of the issuing location.
//! Each gate is exposed on its own; [`TokenValidator::check_in_at`] combines
//! them and accepts only when every gate passes.

use crate::error::TokenResult;
use crate::token::{validate_signature, AttendanceToken};
use rollcall_core::{geo, Clock, Config, GeoCoordinate, SystemClock, DEFAULT_MAX_DISTANCE_M};
use rollcall_crypto::TokenVerifier;
use serde::Serialize;
use tracing::{debug, warn};

/// Why a check-in was refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    WrongTokenType { found: String },
    InvalidSignature,
    NotYetValid { starts_at: u64 },
    Expired { expired_at: u64 },
    OutOfRange { distance_m: f64, max_distance_m: f64 },
    /// The token or the scanner did not supply a location
    LocationUnavailable,
    /// The token carries a location outside the valid coordinate range
    InvalidLocation,
}

/// Outcome of a combined check-in evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInVerdict {
    pub accepted: bool,
    pub signature_valid: bool,
    pub time_valid: bool,
    /// Distance between scanner and issuing location, when both are known
    pub distance_m: Option<f64>,
    pub rejections: Vec<RejectionReason>,
}

/// Judges attendance tokens presented by scanners.
pub struct TokenValidator<V: TokenVerifier> {
    verifier: V,
    expected_type: String,
    max_distance_m: f64,
    clock: Box<dyn Clock>,
}

impl<V: TokenVerifier> TokenValidator<V> {
    /// Validator expecting `attendance` tokens within the default 100 m radius.
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            expected_type: crate::ATTENDANCE_TOKEN_TYPE.to_string(),
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            clock: Box::new(SystemClock),
        }
    }

    pub fn from_config(verifier: V, config: &Config) -> TokenResult<Self> {
        let mut validator =
            Self::new(verifier).with_max_distance(config.proximity.max_distance_m)?;
        validator.expected_type = config.issuance.token_type.clone();
        Ok(validator)
    }

    pub fn with_max_distance(mut self, max_distance_m: f64) -> TokenResult<Self> {
        geo::validate_radius(max_distance_m)?;
        self.max_distance_m = max_distance_m;
        Ok(self)
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn max_distance_m(&self) -> f64 {
        self.max_distance_m
    }

    /// Signature gate.
    pub fn validate_signature(&self, token: &AttendanceToken) -> bool {
        let valid = validate_signature(&self.verifier, token);
        if !valid {
            warn!(
                course_id = %token.course_id,
                session_id = %token.session_id,
                "Attendance token signature mismatch"
            );
        }
        valid
    }

    /// Time gate against the validator's clock.
    pub fn is_time_valid(&self, token: &AttendanceToken) -> bool {
        token.is_time_valid_at(self.clock.now_ms())
    }

    /// Proximity gate. `None` when the token carries no usable location.
    pub fn is_within_radius(
        &self,
        token: &AttendanceToken,
        scanner: &GeoCoordinate,
    ) -> Option<bool> {
        let venue = token.location?.coordinate().ok()?;
        Some(scanner.is_within(&venue, self.max_distance_m))
    }

    /// Combined check-in at the validator's clock.
    pub fn check_in(
        &self,
        token: &AttendanceToken,
        scanner: Option<GeoCoordinate>,
    ) -> CheckInVerdict {
        self.check_in_at(token, scanner, self.clock.now_ms())
    }

    /// Evaluate every gate at `now_ms` and collect all failures.
    pub fn check_in_at(
        &self,
        token: &AttendanceToken,
        scanner: Option<GeoCoordinate>,
        now_ms: u64,
    ) -> CheckInVerdict {
        let mut rejections = Vec::new();

        if token.token_type != self.expected_type {
            rejections.push(RejectionReason::WrongTokenType {
                found: token.token_type.clone(),
            });
        }

        let signature_valid = self.validate_signature(token);
        if !signature_valid {
            rejections.push(RejectionReason::InvalidSignature);
        }

        let time_valid = token.is_time_valid_at(now_ms);
        if now_ms < token.timestamp {
            rejections.push(RejectionReason::NotYetValid {
                starts_at: token.timestamp,
            });
        } else if token.is_expired_at(now_ms) {
            rejections.push(RejectionReason::Expired {
                expired_at: token.expires_at,
            });
        }

        let mut distance_m = None;
        match (token.location, scanner) {
            (Some(location), Some(scanner)) => match location.coordinate() {
                Ok(venue) => {
                    let distance = scanner.haversine_distance(&venue);
                    distance_m = Some(distance);
                    if distance > self.max_distance_m {
                        rejections.push(RejectionReason::OutOfRange {
                            distance_m: distance,
                            max_distance_m: self.max_distance_m,
                        });
                    }
                }
                Err(_) => rejections.push(RejectionReason::InvalidLocation),
            },
            _ => rejections.push(RejectionReason::LocationUnavailable),
        }

        let verdict = CheckInVerdict {
            accepted: rejections.is_empty(),
            signature_valid,
            time_valid,
            distance_m,
            rejections,
        };

        debug!(
            course_id = %token.course_id,
            session_id = %token.session_id,
            accepted = verdict.accepted,
            rejections = verdict.rejections.len(),
            "Evaluated check-in"
        );

        verdict
    }
}
