//! Test utilities for cross-crate integration tests

use rollcall_core::{Config, FixedClock, GeoCoordinate};
use rollcall_crypto::{HmacSigner, SigningSecret};
use rollcall_token::{Location, TokenIssuer, TokenValidator};
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route `tracing` output through the test harness so it shows on failure.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Config with a fresh shared secret, as an operator would deploy it.
pub fn deployment_config() -> Config {
    let mut config = Config::default_config();
    config.issuance.signing_secret_hex = Some(SigningSecret::generate().to_hex());
    config
}

/// Instructor and student sides of one deployment, both built from `config`.
pub struct TestDeployment {
    pub issuer: TokenIssuer<HmacSigner>,
    pub validator: TokenValidator<HmacSigner>,
}

impl TestDeployment {
    pub fn from_config(config: &Config, now_ms: u64) -> Self {
        let secret_hex = config
            .issuance
            .signing_secret_hex
            .as_deref()
            .expect("deployment config carries a secret");

        let issuer = TokenIssuer::from_config(
            HmacSigner::from_hex(secret_hex).unwrap(),
            &config.issuance,
        )
        .unwrap()
        .with_clock(FixedClock(now_ms));

        let validator =
            TokenValidator::from_config(HmacSigner::from_hex(secret_hex).unwrap(), config)
                .unwrap()
                .with_clock(FixedClock(now_ms));

        Self { issuer, validator }
    }
}

/// Room 4.12, where the lecture is held.
pub fn lecture_room() -> Location {
    Location::new(-1.2921, 36.8219, 15.0)
}

/// A point `meters_north` meters north of the lecture room.
pub fn north_of_lecture_room(meters_north: f64) -> GeoCoordinate {
    let degrees = meters_north / 111_195.0;
    GeoCoordinate::new(-1.2921 + degrees, 36.8219).unwrap()
}
