//! End-to-end tests across the Rollcall crates
//!
//! This test suite validates:
//! - Configuration-driven issuance and validation sharing one secret
//! - The full lecture scenario from issuance to expiry
//! - Forgery and replay attempts against the three check-in gates

pub mod test_utils;

#[cfg(test)]
mod lecture_scenarios;

#[cfg(test)]
mod forgery_attempts;
