//! ChartEngine - chart computation over the ephemeris port.
//!
//! The engine wraps every ephemeris call in a bounded retry and translates
//! provider failures into the engine error taxonomy. Charts come out of
//! here fully built; callers never touch raw snapshots.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::activation::{rank_activation, ActivationRecord};
use crate::domain::aspect::{detect_aspects, detect_internal, Aspect};
use crate::domain::chart::{Body, Chart, ChartKind, GeoCoords};
use crate::domain::cycle::locate_cycle;
use crate::domain::foundation::{EngineError, Timestamp};
use crate::ports::{EphemerisError, EphemerisProvider};

/// Chart computation service.
pub struct ChartEngine {
    ephemeris: Arc<dyn EphemerisProvider>,
    config: EngineConfig,
}

impl ChartEngine {
    /// Creates an engine over an ephemeris provider.
    pub fn new(ephemeris: Arc<dyn EphemerisProvider>, config: EngineConfig) -> Self {
        Self { ephemeris, config }
    }

    /// Computes a chart for a moment and place.
    pub fn compute_chart(
        &self,
        kind: ChartKind,
        at: Timestamp,
        coords: GeoCoords,
    ) -> Result<Chart, EngineError> {
        let snapshot = self.with_retry(|| self.ephemeris.snapshot(at, coords))?;
        let chart = Chart::from_snapshot(kind, snapshot, at, coords)?;
        tracing::debug!(kind = %chart.kind, at = %at, "chart computed");
        Ok(chart)
    }

    /// Locates a body's yearly return to its natal longitude and casts the
    /// cycle chart for that moment.
    pub fn cycle_chart(
        &self,
        natal: &Chart,
        body: Body,
        target_year: i32,
        coords: GeoCoords,
    ) -> Result<Chart, EngineError> {
        let natal_longitude = natal
            .position(body)
            .map(|p| p.longitude)
            .ok_or_else(|| EngineError::body_not_tracked(body.to_string()))?;

        let retry = &self.config.ephemeris_retry;
        let return_moment = locate_cycle(
            body,
            natal_longitude,
            natal.cast_at,
            target_year,
            &self.config.cycle,
            |at| {
                with_retry(retry.max_attempts, retry.backoff_ms, || {
                    self.ephemeris.body_longitude(body, at)
                })
            },
        )?;

        tracing::info!(
            body = %body,
            year = target_year,
            at = %return_moment,
            "cycle return located"
        );
        self.compute_chart(ChartKind::Cycle, return_moment, coords)
    }

    /// Aspects within a single chart, deduplicated, tightest first.
    pub fn internal_aspects(&self, chart: &Chart) -> Vec<Aspect> {
        detect_internal(&chart.positions, &self.config.orbs.natal.to_table())
    }

    /// Aspects between two charts under the cross-chart orb table.
    pub fn compare_charts(&self, a: &Chart, b: &Chart) -> Vec<Aspect> {
        detect_aspects(
            &a.positions,
            &b.positions,
            &self.config.orbs.cross_chart.to_table(),
        )
    }

    /// Ranks which natal bodies a cycle chart activates.
    pub fn activations(&self, natal: &Chart, cycle: &Chart) -> Vec<ActivationRecord> {
        rank_activation(natal, cycle, self.config.orbs.activation_tight_orb)
    }

    fn with_retry<T>(
        &self,
        op: impl FnMut() -> Result<T, EphemerisError>,
    ) -> Result<T, EngineError> {
        let retry = &self.config.ephemeris_retry;
        with_retry(retry.max_attempts, retry.backoff_ms, op)
    }
}

/// Runs an ephemeris call with bounded retry on transient errors.
///
/// Non-retryable errors surface immediately; after the last attempt the
/// final error becomes `EphemerisUnavailable` with the attempt count.
fn with_retry<T>(
    max_attempts: u32,
    backoff_ms: u64,
    mut op: impl FnMut() -> Result<T, EphemerisError>,
) -> Result<T, EngineError> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                tracing::warn!(attempt, error = %err, "ephemeris call failed, retrying");
                std::thread::sleep(std::time::Duration::from_millis(
                    backoff_ms * u64::from(attempt),
                ));
            }
            Err(err) => {
                return Err(EngineError::ephemeris_unavailable(attempt, err.to_string()));
            }
        }
    }
}
