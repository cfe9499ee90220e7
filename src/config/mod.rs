//! Engine configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `SOLARA`
//! prefix and `__` as the nesting separator; every section has working
//! defaults so an empty environment yields a usable engine.
//!
//! # Example
//!
//! ```no_run
//! use solara::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod interpretation;
mod orbs;

pub use error::{ConfigError, ValidationError};
pub use interpretation::InterpretationConfig;
pub use orbs::{AspectOrbs, OrbConfig};

use serde::Deserialize;
use std::time::Duration;

use crate::domain::cycle::CycleSearchConfig;

/// Retry policy for the blocking ephemeris provider.
#[derive(Debug, Clone, Deserialize)]
pub struct EphemerisRetryConfig {
    /// Attempts before surfacing `EphemerisUnavailable`.
    #[serde(default = "default_ephemeris_attempts")]
    pub max_attempts: u32,

    /// Base backoff between attempts.
    #[serde(default = "default_ephemeris_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_ephemeris_attempts() -> u32 {
    3
}

fn default_ephemeris_backoff_ms() -> u64 {
    200
}

impl Default for EphemerisRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_ephemeris_attempts(),
            backoff_ms: default_ephemeris_backoff_ms(),
        }
    }
}

impl EphemerisRetryConfig {
    /// Base backoff as a Duration.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EngineConfig {
    /// Aspect orb tables and the activation tight orb.
    #[serde(default)]
    pub orbs: OrbConfig,

    /// Cycle locator search tuning.
    #[serde(default)]
    pub cycle: CycleSearchConfig,

    /// Interpretation cache settings.
    #[serde(default)]
    pub interpretation: InterpretationConfig,

    /// Ephemeris retry policy.
    #[serde(default)]
    pub ephemeris_retry: EphemerisRetryConfig,
}

impl EngineConfig {
    /// Loads configuration from environment variables.
    ///
    /// Reads a `.env` file if present, then environment variables with
    /// the `SOLARA` prefix: `SOLARA__ORBS__ACTIVATION_TIGHT_ORB=2.5`
    /// maps to `orbs.activation_tight_orb`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SOLARA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validates all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orbs.validate()?;
        self.interpretation.validate()?;
        if self.cycle.tolerance_seconds <= 0 {
            return Err(ValidationError::NotPositive {
                field: "cycle.tolerance_seconds",
                value: self.cycle.tolerance_seconds as f64,
            }
            .into());
        }
        if self.cycle.scan_step_hours <= 0 || self.cycle.bracket_probe_hours <= 0 {
            return Err(ValidationError::NotPositive {
                field: "cycle.scan_step_hours",
                value: self.cycle.scan_step_hours as f64,
            }
            .into());
        }
        Ok(())
    }
}
