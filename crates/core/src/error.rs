//! Core error types

use thiserror::Error;

/// Core error type for Rollcall
#[derive(Debug, Error)]
pub enum CoreError {
    /// Coordinate outside the valid latitude/longitude range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Proximity radius that cannot be compared against
    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed configuration file
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
