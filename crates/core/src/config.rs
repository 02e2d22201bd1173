//! Configuration management for Rollcall.
//!
//! Configuration is read from TOML. Every section and field is optional and
//! falls back to the values of [`Config::default_config`].
//!
//! ```toml
//! [issuance]
//! token_type = "attendance"
//! validity_window_ms = 300000
//! signing_secret_hex = "..."
//!
//! [proximity]
//! max_distance_m = 100.0
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use crate::error::{CoreError, Result};
use crate::geo::{validate_radius, DEFAULT_MAX_DISTANCE_M};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Token type tag written into every issued attendance token.
pub const DEFAULT_TOKEN_TYPE: &str = "attendance";

/// How long an issued token stays valid (5 minutes).
pub const DEFAULT_VALIDITY_WINDOW_MS: u64 = 300_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub issuance: IssuanceConfig,
    pub proximity: ProximityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuanceConfig {
    pub token_type: String,
    pub validity_window_ms: u64,
    /// Hex-encoded HMAC secret shared by issuers and validators.
    pub signing_secret_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub max_distance_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            validity_window_ms: DEFAULT_VALIDITY_WINDOW_MS,
            signing_secret_hex: None,
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.issuance.token_type.trim().is_empty() {
            return Err(CoreError::Config(
                "issuance.token_type must not be empty".to_string(),
            ));
        }
        if self.issuance.validity_window_ms == 0 {
            return Err(CoreError::Config(
                "issuance.validity_window_ms must be greater than zero".to_string(),
            ));
        }
        validate_radius(self.proximity.max_distance_m)
            .map_err(|e| CoreError::Config(format!("proximity.max_distance_m: {}", e)))?;
        Ok(())
    }
}
