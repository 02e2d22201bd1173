//! Geographic primitives for the proximity gate.
//!
//! A check-in is only accepted when the scanning device is physically close
//! to the location the attendance code was issued from. Distances are
//! great-circle distances on a spherical Earth computed with the haversine
//! formula.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default check-in radius around the issuing location, in meters.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 100.0;

/// Geographic coordinates (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Create a new geographic coordinate
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    ///
    /// # Returns
    /// * `Ok(GeoCoordinate)` - Valid coordinate
    /// * `Err(CoreError::InvalidCoordinate)` - Out of range or not finite
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidCoordinate(format!(
                "Latitude must be between -90 and 90, got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidCoordinate(format!(
                "Longitude must be between -180 and 180, got {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Calculate haversine distance to another coordinate in meters
    ///
    /// The intermediate `a` is clamped to `[0, 1]` so floating-point
    /// overshoot on near-antipodal points cannot produce `NaN`.
    pub fn haversine_distance(&self, other: &GeoCoordinate) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = lat2_rad - lat1_rad;
        let delta_lon = other.longitude.to_radians() - self.longitude.to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let a = a.clamp(0.0, 1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Whether `other` lies within `max_distance_m` meters (inclusive).
    pub fn is_within(&self, other: &GeoCoordinate, max_distance_m: f64) -> bool {
        self.haversine_distance(other) <= max_distance_m
    }
}

/// Haversine distance in meters between two points given in decimal degrees.
///
/// Rejects coordinates outside the valid latitude/longitude range.
pub fn haversine_distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    let from = GeoCoordinate::new(lat1, lon1)?;
    let to = GeoCoordinate::new(lat2, lon2)?;
    Ok(from.haversine_distance(&to))
}

/// Whether the user is within `max_distance_m` meters of the target (inclusive).
///
/// Pass [`DEFAULT_MAX_DISTANCE_M`] for the standard check-in radius.
pub fn is_within_radius(
    user_lat: f64,
    user_lon: f64,
    target_lat: f64,
    target_lon: f64,
    max_distance_m: f64,
) -> Result<bool> {
    validate_radius(max_distance_m)?;
    let distance_m = haversine_distance_meters(user_lat, user_lon, target_lat, target_lon)?;
    Ok(distance_m <= max_distance_m)
}

/// Rejects radii that no distance can meaningfully be compared against.
pub fn validate_radius(max_distance_m: f64) -> Result<()> {
    if !max_distance_m.is_finite() || max_distance_m < 0.0 {
        return Err(CoreError::InvalidRadius(format!(
            "Radius must be a non-negative number of meters, got {}",
            max_distance_m
        )));
    }
    Ok(())
}
