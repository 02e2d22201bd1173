//! Attendance tokens for QR check-in.
//!
//! An instructor-side issuer mints a short-lived, signed token describing a
//! course session and the place it is held. The token is rendered as a QR
//! code; a student-side scanner decodes it and asks a validator three
//! independent questions:
//!
//! - **Signature**: do the token's identity and time fields match its signature?
//! - **Time window**: is the scan inside `[timestamp, expires_at]`?
//! - **Proximity**: is the scanning device within the allowed radius of the
//!   issuing location?
//!
//! Attendance is accepted only when all three pass.
//!
//! ```
//! use rollcall_core::GeoCoordinate;
//! use rollcall_crypto::{HmacSigner, SigningSecret};
//! use rollcall_token::{Location, TokenIssuer, TokenValidator};
//!
//! let secret = SigningSecret::generate();
//! let issuer = TokenIssuer::new(HmacSigner::new(&secret).unwrap());
//! let validator = TokenValidator::new(HmacSigner::new(&secret).unwrap());
//!
//! let now = 1_760_000_000_000;
//! let token = issuer
//!     .issue_at(now, "CS101", "instr-1", Some(Location::new(-1.2921, 36.8219, 10.0)))
//!     .unwrap();
//!
//! let scanner = GeoCoordinate::new(-1.2922, 36.8219).unwrap();
//! assert!(validator.check_in_at(&token, Some(scanner), now + 30_000).accepted);
//! ```

pub mod error;
pub mod issuer;
pub mod token;
pub mod validator;

pub use error::{TokenError, TokenResult};
pub use issuer::TokenIssuer;
pub use token::{
    generate_signature, validate_signature, AttendanceToken, Location, SignedFields,
    ATTENDANCE_TOKEN_TYPE,
};
pub use validator::{CheckInVerdict, RejectionReason, TokenValidator};
