//! Solar-return root finder.
//!
//! Finds the timestamp in a target year at which a body's transiting
//! longitude equals a natal reference value. The function under search is
//! `f(t) = wrap_pm180(lon(t) - natal_longitude)`; its genuine zero
//! crossings are the return moments. The fast path brackets the calendar
//! window around the natal anniversary and bisects; when the bracket is
//! not a single monotonic crossing (retrograde motion), the whole year is
//! scanned at a fixed step and the root nearest the anniversary wins.

use serde::{Deserialize, Serialize};

use crate::domain::chart::Body;
use crate::domain::foundation::{EngineError, Timestamp};

/// Tuning for the cycle search. All values have workable defaults; they
/// are surfaced through the engine configuration rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSearchConfig {
    /// Half-width of the anniversary bracket in days.
    #[serde(default = "default_bracket_half_width_days")]
    pub bracket_half_width_days: i64,

    /// Probe spacing inside the bracket, in hours.
    #[serde(default = "default_bracket_probe_hours")]
    pub bracket_probe_hours: i64,

    /// Sample spacing for the full-year fallback scan, in hours.
    #[serde(default = "default_scan_step_hours")]
    pub scan_step_hours: i64,

    /// Bisection stops once the bracket is narrower than this, in seconds.
    #[serde(default = "default_tolerance_seconds")]
    pub tolerance_seconds: i64,

    /// Hard cap on bisection iterations per bracket.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_bracket_half_width_days() -> i64 {
    16
}

fn default_bracket_probe_hours() -> i64 {
    24
}

fn default_scan_step_hours() -> i64 {
    6
}

fn default_tolerance_seconds() -> i64 {
    60
}

fn default_max_iterations() -> u32 {
    64
}

impl Default for CycleSearchConfig {
    fn default() -> Self {
        Self {
            bracket_half_width_days: default_bracket_half_width_days(),
            bracket_probe_hours: default_bracket_probe_hours(),
            scan_step_hours: default_scan_step_hours(),
            tolerance_seconds: default_tolerance_seconds(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Wraps an angle difference into (-180, +180].
fn wrap_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// A sign change is a genuine crossing only when it is not the wrap
/// discontinuity jumping between ~+180 and ~-180.
fn is_genuine_crossing(f_a: f64, f_b: f64) -> bool {
    f_a * f_b <= 0.0 && (f_a - f_b).abs() < 270.0
}

/// Locates the moment in `target_year` at which the body's transiting
/// longitude equals `natal_longitude`, within the configured tolerance.
///
/// `ephemeris_fn` evaluates the body's longitude at a timestamp; provider
/// errors propagate unchanged. Fails with [`EngineError::NoRootFound`]
/// when no genuine crossing exists anywhere in the sampled year; that is
/// fatal for the request and never approximated.
pub fn locate_cycle<F>(
    body: Body,
    natal_longitude: f64,
    natal_moment: Timestamp,
    target_year: i32,
    config: &CycleSearchConfig,
    mut ephemeris_fn: F,
) -> Result<Timestamp, EngineError>
where
    F: FnMut(Timestamp) -> Result<f64, EngineError>,
{
    let natal = natal_longitude.rem_euclid(360.0);
    let anniversary = natal_moment.anniversary_in_year(target_year);

    // Probe the anniversary bracket.
    let start = anniversary.minus_days(config.bracket_half_width_days);
    let end = anniversary.plus_days(config.bracket_half_width_days);
    let probes = sample(start, end, config.bracket_probe_hours * 3600, natal, &mut ephemeris_fn)?;

    if let Some((t_a, f_a, t_b, f_b)) = single_monotonic_crossing(&probes) {
        return bisect(t_a, f_a, t_b, f_b, config, natal, &mut ephemeris_fn);
    }

    // Non-monotonic bracket or no crossing near the anniversary: scan the
    // whole target year and take the root nearest the anniversary.
    tracing::debug!(
        body = %body,
        target_year,
        "anniversary bracket not a single monotonic crossing, scanning full year"
    );

    let year_start = Timestamp::start_of_year(target_year);
    let year_end = Timestamp::end_of_year(target_year);
    let samples = sample(year_start, year_end, config.scan_step_hours * 3600, natal, &mut ephemeris_fn)?;

    let mut nearest: Option<Timestamp> = None;
    for window in samples.windows(2) {
        let (t_a, f_a) = window[0];
        let (t_b, f_b) = window[1];
        if !is_genuine_crossing(f_a, f_b) {
            continue;
        }
        let root = bisect(t_a, f_a, t_b, f_b, config, natal, &mut ephemeris_fn)?;
        let closer = match nearest {
            Some(best) => {
                root.seconds_since(&anniversary).abs() < best.seconds_since(&anniversary).abs()
            }
            None => true,
        };
        if closer {
            nearest = Some(root);
        }
    }

    nearest.ok_or_else(|| EngineError::no_root_found(body.to_string(), target_year, natal))
}

/// Evaluates the wrapped delta function at fixed steps across [start, end].
fn sample<F>(
    start: Timestamp,
    end: Timestamp,
    step_secs: i64,
    natal: f64,
    ephemeris_fn: &mut F,
) -> Result<Vec<(Timestamp, f64)>, EngineError>
where
    F: FnMut(Timestamp) -> Result<f64, EngineError>,
{
    let mut points = Vec::new();
    let mut t = start;
    while t <= end {
        points.push((t, wrap_pm180(ephemeris_fn(t)? - natal)));
        t = t.plus_seconds(step_secs);
    }
    if points.last().map(|(t, _)| *t) != Some(end) {
        points.push((end, wrap_pm180(ephemeris_fn(end)? - natal)));
    }
    Ok(points)
}

/// Returns the bracketing pair when the probes show exactly one genuine
/// crossing and the delta is monotonic across the window.
///
/// Retrograde motion breaks monotonicity and can produce several
/// crossings; both cases defer to the full-year scan.
fn single_monotonic_crossing(
    probes: &[(Timestamp, f64)],
) -> Option<(Timestamp, f64, Timestamp, f64)> {
    let mut crossing: Option<(Timestamp, f64, Timestamp, f64)> = None;
    for window in probes.windows(2) {
        let (t_a, f_a) = window[0];
        let (t_b, f_b) = window[1];
        // Monotonicity check: between probes the wrapped delta must keep
        // advancing forward (allowing the +180 -> -180 wrap jump).
        let step = f_b - f_a;
        let advancing = step >= 0.0 || step <= -270.0;
        if !advancing {
            return None;
        }
        if is_genuine_crossing(f_a, f_b) {
            if crossing.is_some() {
                return None;
            }
            crossing = Some((t_a, f_a, t_b, f_b));
        }
    }
    crossing
}

/// Closed-bracket bisection on the wrapped delta function.
fn bisect<F>(
    mut t_a: Timestamp,
    mut f_a: f64,
    mut t_b: Timestamp,
    _f_b: f64,
    config: &CycleSearchConfig,
    natal: f64,
    ephemeris_fn: &mut F,
) -> Result<Timestamp, EngineError>
where
    F: FnMut(Timestamp) -> Result<f64, EngineError>,
{
    for _ in 0..config.max_iterations {
        if t_b.seconds_since(&t_a) <= config.tolerance_seconds {
            break;
        }
        let t_mid = t_a.midpoint(&t_b);
        let f_mid = wrap_pm180(ephemeris_fn(t_mid)? - natal);
        if is_genuine_crossing(f_a, f_mid) {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }
    }
    Ok(t_a.midpoint(&t_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{resolve, ZodiacSign};
    use chrono::{DateTime, Utc};

    const MEAN_SUN_RATE: f64 = 360.0 / 365.2422; // degrees per day

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc),
        )
    }

    /// Linear mean-sun model anchored at the natal moment.
    fn mean_sun(
        natal_longitude: f64,
        natal_moment: Timestamp,
    ) -> impl FnMut(Timestamp) -> Result<f64, EngineError> {
        move |t: Timestamp| {
            let days = t.seconds_since(&natal_moment) as f64 / 86_400.0;
            Ok((natal_longitude + MEAN_SUN_RATE * days).rem_euclid(360.0))
        }
    }

    #[test]
    fn wrap_pm180_folds_into_half_open_range() {
        assert_eq!(wrap_pm180(0.0), 0.0);
        assert_eq!(wrap_pm180(190.0), -170.0);
        assert_eq!(wrap_pm180(-190.0), 170.0);
        assert_eq!(wrap_pm180(540.0), 180.0);
    }

    #[test]
    fn wrap_jump_is_not_a_genuine_crossing() {
        assert!(is_genuine_crossing(-0.5, 0.5));
        assert!(!is_genuine_crossing(179.0, -179.0));
    }

    #[test]
    fn locates_solar_return_round_trip() {
        // Natal Sun at 320.5 deg (Aquarius), born 1990-02-09.
        let natal_moment = ts("1990-02-09T12:00:00Z");
        let natal_longitude = 320.5;
        let config = CycleSearchConfig::default();

        let found = locate_cycle(
            Body::Sun,
            natal_longitude,
            natal_moment,
            2025,
            &config,
            mean_sun(natal_longitude, natal_moment),
        )
        .unwrap();

        // Round trip: the located moment's longitude matches the natal
        // value within one arc-minute.
        let mut eph = mean_sun(natal_longitude, natal_moment);
        let lon = eph(found).unwrap();
        assert!(wrap_pm180(lon - natal_longitude).abs() < 1.0 / 60.0);

        let pos = resolve(lon);
        assert_eq!(pos.sign, ZodiacSign::Aquarius);
        assert_eq!(pos.degree, 20);

        // The return lands in the anniversary window of the target year.
        assert_eq!(found.year(), 2025);
        let anniversary = natal_moment.anniversary_in_year(2025);
        assert!(found.seconds_since(&anniversary).abs() < 10 * 86_400);
    }

    #[test]
    fn result_is_within_time_tolerance() {
        let natal_moment = ts("2000-06-21T03:30:00Z");
        let natal_longitude = 90.0;
        let config = CycleSearchConfig::default();

        let found = locate_cycle(
            Body::Sun,
            natal_longitude,
            natal_moment,
            2010,
            &config,
            mean_sun(natal_longitude, natal_moment),
        )
        .unwrap();

        // The exact root of the linear model is natal + k * 365.2422 days.
        let exact_secs = (10.0_f64 * 365.2422 * 86_400.0).round() as i64;
        let exact = natal_moment.plus_seconds(exact_secs);
        assert!(found.seconds_since(&exact).abs() <= config.tolerance_seconds + 1);
    }

    #[test]
    fn natal_longitude_wraps_through_zero() {
        // Natal Sun just before the Aries point; f(t) crosses the 0/360 seam.
        let natal_moment = ts("1995-03-20T18:00:00Z");
        let natal_longitude = 359.6;
        let config = CycleSearchConfig::default();

        let found = locate_cycle(
            Body::Sun,
            natal_longitude,
            natal_moment,
            2020,
            &config,
            mean_sun(natal_longitude, natal_moment),
        )
        .unwrap();

        let mut eph = mean_sun(natal_longitude, natal_moment);
        let lon = eph(found).unwrap();
        assert!(wrap_pm180(lon - natal_longitude).abs() < 1.0 / 60.0);
    }

    #[test]
    fn non_monotonic_motion_falls_back_to_year_scan() {
        // A synthetic retrograde body: steady forward motion plus a large
        // oscillation, crossing the natal longitude several times. The
        // locator must still return the crossing nearest the anniversary.
        let natal_moment = ts("1980-04-10T00:00:00Z");
        let natal_longitude = 20.0;
        let config = CycleSearchConfig::default();

        let wobbly = |t: Timestamp| -> Result<f64, EngineError> {
            let days = t.seconds_since(&natal_moment) as f64 / 86_400.0;
            let lon = natal_longitude + MEAN_SUN_RATE * days + 25.0 * (days / 18.0).sin();
            Ok(lon.rem_euclid(360.0))
        };

        let found = locate_cycle(
            Body::Mercury,
            natal_longitude,
            natal_moment,
            1984,
            &config,
            wobbly,
        )
        .unwrap();

        let lon = wobbly(found).unwrap();
        assert!(wrap_pm180(lon - natal_longitude).abs() < 0.05);
        assert_eq!(found.year(), 1984);
    }

    #[test]
    fn no_crossing_surfaces_no_root_found() {
        // A body frozen 90 degrees away from the natal longitude.
        let natal_moment = ts("1970-01-01T00:00:00Z");
        let config = CycleSearchConfig::default();

        let err = locate_cycle(
            Body::Pluto,
            10.0,
            natal_moment,
            1999,
            &config,
            |_| Ok(100.0),
        )
        .unwrap_err();

        match err {
            EngineError::NoRootFound {
                body,
                year,
                natal_longitude,
            } => {
                assert_eq!(body, "Pluto");
                assert_eq!(year, 1999);
                assert_eq!(natal_longitude, 10.0);
            }
            other => panic!("expected NoRootFound, got {other}"),
        }
    }

    #[test]
    fn provider_errors_propagate() {
        let natal_moment = ts("1970-01-01T00:00:00Z");
        let config = CycleSearchConfig::default();

        let err = locate_cycle(Body::Sun, 10.0, natal_moment, 2000, &config, |_| {
            Err(EngineError::ephemeris_unavailable(1, "offline"))
        })
        .unwrap_err();

        assert!(matches!(err, EngineError::EphemerisUnavailable { .. }));
    }
}
