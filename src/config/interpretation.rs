//! Interpretation cache configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Budget, TTL, claim and retry settings for the interpretation cache.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretationConfig {
    /// Narrative generations allowed per subject per calendar year.
    #[serde(default = "default_annual_generation_cap")]
    pub annual_generation_cap: u32,

    /// TTL of fallback records in days; short, so a fresh budget can
    /// supersede them.
    #[serde(default = "default_fallback_ttl_days")]
    pub fallback_ttl_days: i64,

    /// TTL of progressed-chart records in days.
    #[serde(default = "default_progressed_ttl_days")]
    pub progressed_ttl_days: i64,

    /// Lease on a generation claim in seconds; an abandoned claim frees
    /// itself after this long.
    #[serde(default = "default_claim_lease_secs")]
    pub claim_lease_secs: i64,

    /// How long a claim loser waits for the winner's record.
    #[serde(default = "default_claim_wait_timeout_ms")]
    pub claim_wait_timeout_ms: u64,

    /// Poll interval while waiting on a held claim.
    #[serde(default = "default_claim_poll_interval_ms")]
    pub claim_poll_interval_ms: u64,

    /// Attempts against the narrative provider before falling back.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,

    /// Base backoff between generation attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Cost estimate recorded per budget call, in cents.
    #[serde(default = "default_cost_estimate_cents")]
    pub cost_estimate_cents: u32,
}

fn default_annual_generation_cap() -> u32 {
    1
}

fn default_fallback_ttl_days() -> i64 {
    7
}

fn default_progressed_ttl_days() -> i64 {
    30
}

fn default_claim_lease_secs() -> i64 {
    60
}

fn default_claim_wait_timeout_ms() -> u64 {
    10_000
}

fn default_claim_poll_interval_ms() -> u64 {
    250
}

fn default_max_generation_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_cost_estimate_cents() -> u32 {
    10
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        Self {
            annual_generation_cap: default_annual_generation_cap(),
            fallback_ttl_days: default_fallback_ttl_days(),
            progressed_ttl_days: default_progressed_ttl_days(),
            claim_lease_secs: default_claim_lease_secs(),
            claim_wait_timeout_ms: default_claim_wait_timeout_ms(),
            claim_poll_interval_ms: default_claim_poll_interval_ms(),
            max_generation_attempts: default_max_generation_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            cost_estimate_cents: default_cost_estimate_cents(),
        }
    }
}

impl InterpretationConfig {
    /// Claim wait timeout as a Duration.
    pub fn claim_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.claim_wait_timeout_ms)
    }

    /// Claim poll interval as a Duration.
    pub fn claim_poll_interval(&self) -> Duration {
        Duration::from_millis(self.claim_poll_interval_ms)
    }

    /// Base retry backoff as a Duration.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validates the cache settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            (
                "interpretation.fallback_ttl_days",
                self.fallback_ttl_days as f64,
            ),
            (
                "interpretation.progressed_ttl_days",
                self.progressed_ttl_days as f64,
            ),
            (
                "interpretation.claim_lease_secs",
                self.claim_lease_secs as f64,
            ),
            (
                "interpretation.max_generation_attempts",
                self.max_generation_attempts as f64,
            ),
        ] {
            if value <= 0.0 {
                return Err(ValidationError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}
