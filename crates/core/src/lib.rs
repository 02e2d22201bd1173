//! Core functionality for the Rollcall attendance check-in system.
//!
//! This crate provides the fundamental types and utilities shared by the
//! signing and token crates: error types, configuration, logging, a clock
//! abstraction and the geographic primitives behind the proximity gate.
//!
//! # Core Concepts
//!
//! - **Coordinates**: validated latitude/longitude pairs in decimal degrees
//! - **Distance**: haversine great-circle distance on a spherical Earth
//! - **Proximity**: inclusive radius check between a scanner and a venue
//! - **Clock**: epoch-millisecond time source that tests can pin

pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod logging;

pub use clock::{now_ms, Clock, FixedClock, SystemClock};
pub use config::{
    Config, IssuanceConfig, LoggingConfig, ProximityConfig, DEFAULT_TOKEN_TYPE,
    DEFAULT_VALIDITY_WINDOW_MS,
};
pub use error::{CoreError, Result};
pub use geo::{
    haversine_distance_meters, is_within_radius, validate_radius, GeoCoordinate,
    DEFAULT_MAX_DISTANCE_M, EARTH_RADIUS_M,
};
