//! Mean-motion ephemeris adapter.
//!
//! Linear body motion at the classical mean rates from the J2000 mean
//! longitudes, with equal houses off a time-and-place derived ascendant.
//! Deterministic and closed-form, which is what tests and local runs need;
//! accuracy-grade positions come from a real ephemeris behind the same
//! port.

use crate::domain::chart::{Body, CelestialPosition, EphemerisSnapshot, GeoCoords};
use crate::domain::foundation::Timestamp;
use crate::ports::{EphemerisError, EphemerisProvider};

/// J2000.0 epoch, 2000-01-01T12:00:00Z.
const J2000_UNIX_SECS: i64 = 946_728_000;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Mean longitude at J2000.0 in degrees.
fn epoch_longitude(body: Body) -> f64 {
    match body {
        Body::Sun => 280.460,
        Body::Moon => 218.316,
        Body::Mercury => 252.251,
        Body::Venus => 181.980,
        Body::Mars => 355.433,
        Body::Jupiter => 34.351,
        Body::Saturn => 50.077,
        Body::Uranus => 314.055,
        Body::Neptune => 304.349,
        Body::Pluto => 238.929,
    }
}

/// Mean motion in degrees per day.
fn mean_motion(body: Body) -> f64 {
    match body {
        Body::Sun => 0.985_647,
        Body::Moon => 13.176_358,
        Body::Mercury => 4.092_339,
        Body::Venus => 1.602_131,
        Body::Mars => 0.524_039,
        Body::Jupiter => 0.083_056,
        Body::Saturn => 0.033_371,
        Body::Uranus => 0.011_698,
        Body::Neptune => 0.005_965,
        Body::Pluto => 0.003_964,
    }
}

/// Closed-form mean-motion ephemeris.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanMotionEphemeris {
    /// Uniform longitude shift applied to every body.
    shift: f64,
}

impl MeanMotionEphemeris {
    /// Creates the unshifted J2000 model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model shifted so the Sun sits at `sun_longitude` at `at`.
    ///
    /// The shift applies to all bodies alike, so relative geometry is
    /// preserved. Handy for pinning a known natal Sun in tests.
    pub fn anchored(at: Timestamp, sun_longitude: f64) -> Self {
        let unshifted = Self::new().longitude_at(Body::Sun, at);
        Self {
            shift: sun_longitude - unshifted,
        }
    }

    fn longitude_at(&self, body: Body, at: Timestamp) -> f64 {
        let days = (at.as_unix_secs() - J2000_UNIX_SECS) as f64 / SECONDS_PER_DAY;
        (epoch_longitude(body) + mean_motion(body) * days + self.shift).rem_euclid(360.0)
    }

    /// Ascendant from the rotation phase of the day plus the observer's
    /// east longitude. Crude, but monotone in time and place.
    fn ascendant_at(&self, at: Timestamp, coords: GeoCoords) -> f64 {
        let day_fraction = at.as_unix_secs().rem_euclid(86_400) as f64 / SECONDS_PER_DAY;
        (self.longitude_at(Body::Sun, at) + day_fraction * 360.0 + coords.longitude)
            .rem_euclid(360.0)
    }
}

impl EphemerisProvider for MeanMotionEphemeris {
    fn snapshot(
        &self,
        at: Timestamp,
        coords: GeoCoords,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        let positions = Body::all()
            .map(|body| {
                CelestialPosition::new(body, self.longitude_at(body, at))
                    .with_speed(mean_motion(body))
            })
            .collect();

        let ascendant = self.ascendant_at(at, coords);
        let cusps = (0..12)
            .map(|i| (ascendant + 30.0 * i as f64).rem_euclid(360.0))
            .collect::<Vec<_>>();
        let midheaven = cusps[9];

        Ok(EphemerisSnapshot {
            positions,
            cusps,
            ascendant,
            midheaven,
        })
    }

    fn body_longitude(&self, body: Body, at: Timestamp) -> Result<f64, EphemerisError> {
        Ok(self.longitude_at(body, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_advances_at_the_mean_rate() {
        let eph = MeanMotionEphemeris::new();
        let t0 = Timestamp::from_unix_secs(J2000_UNIX_SECS);
        let t1 = t0.plus_days(1);
        let delta = (eph.body_longitude(Body::Sun, t1).unwrap()
            - eph.body_longitude(Body::Sun, t0).unwrap())
        .rem_euclid(360.0);
        assert!((delta - 0.985_647).abs() < 1e-9);
    }

    #[test]
    fn anchoring_pins_the_sun() {
        let at = Timestamp::from_unix_secs(571_849_500);
        let eph = MeanMotionEphemeris::anchored(at, 320.5);
        assert!((eph.body_longitude(Body::Sun, at).unwrap() - 320.5).abs() < 1e-9);
    }

    #[test]
    fn snapshot_carries_all_bodies_and_twelve_cusps() {
        let eph = MeanMotionEphemeris::new();
        let snap = eph
            .snapshot(
                Timestamp::from_unix_secs(J2000_UNIX_SECS),
                GeoCoords::new(52.52, 13.40),
            )
            .unwrap();
        assert_eq!(snap.positions.len(), 10);
        assert_eq!(snap.cusps.len(), 12);
        assert_eq!(snap.cusps[0], snap.ascendant);
        assert_eq!(snap.midheaven, snap.cusps[9]);
    }

    #[test]
    fn sun_returns_in_roughly_a_year() {
        let eph = MeanMotionEphemeris::new();
        let t0 = Timestamp::from_unix_secs(J2000_UNIX_SECS);
        let start = eph.body_longitude(Body::Sun, t0).unwrap();
        let one_year = t0.plus_days(365);
        let near = eph.body_longitude(Body::Sun, one_year).unwrap();
        let gap = (near - start).rem_euclid(360.0).min((start - near).rem_euclid(360.0));
        assert!(gap < 1.0, "gap was {gap}");
    }
}
