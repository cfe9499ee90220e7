//! Pairwise aspect detection.

use crate::domain::chart::CelestialPosition;

use super::{Aspect, AspectType, OrbTable};

/// Minimal angular separation between two longitudes, in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Best aspect match for a separation, if any type's orb admits it.
///
/// With realistic orbs the aspect angles are far enough apart that at most
/// one type qualifies; when two do, the smaller consumed orb wins.
fn best_match(separation: f64, orbs: &OrbTable) -> Option<(AspectType, f64, f64)> {
    let mut best: Option<(AspectType, f64, f64)> = None;
    for (aspect, max_orb) in orbs.entries() {
        let consumed = (separation - aspect.exact_angle()).abs();
        if consumed <= max_orb {
            let better = match best {
                Some((_, _, best_consumed)) => consumed < best_consumed,
                None => true,
            };
            if better {
                best = Some((aspect, max_orb, consumed));
            }
        }
    }
    best
}

fn aspect_between(
    a: &CelestialPosition,
    b: &CelestialPosition,
    orbs: &OrbTable,
) -> Option<Aspect> {
    let separation = angular_separation(a.longitude, b.longitude);
    best_match(separation, orbs).map(|(aspect_type, orb_allowed, orb_consumed)| Aspect {
        body_a: a.body,
        body_b: b.body,
        aspect_type,
        separation,
        orb_allowed,
        orb_consumed,
    })
}

/// Detects aspects between two distinct position sets (e.g. natal against
/// a cycle chart).
///
/// Every (a, b) pair is examined once; pass [`OrbTable::default_cross_chart`]
/// or any caller-tuned table.
pub fn detect_aspects(
    positions_a: &[CelestialPosition],
    positions_b: &[CelestialPosition],
    orbs: &OrbTable,
) -> Vec<Aspect> {
    let mut found = Vec::new();
    for a in positions_a {
        for b in positions_b {
            if let Some(aspect) = aspect_between(a, b, orbs) {
                found.push(aspect);
            }
        }
    }
    found.sort_by(|x, y| x.orb_consumed.total_cmp(&y.orb_consumed));
    found
}

/// Detects aspects within a single chart.
///
/// Self-pairs are excluded and each unordered pair is emitted at most once,
/// so swapping the iteration order cannot duplicate results.
pub fn detect_internal(positions: &[CelestialPosition], orbs: &OrbTable) -> Vec<Aspect> {
    let mut found = Vec::new();
    for (i, a) in positions.iter().enumerate() {
        for b in positions.iter().skip(i + 1) {
            if a.body == b.body {
                continue;
            }
            if let Some(aspect) = aspect_between(a, b, orbs) {
                found.push(aspect);
            }
        }
    }
    found.sort_by(|x, y| x.orb_consumed.total_cmp(&y.orb_consumed));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::Body;
    use proptest::prelude::*;

    fn pos(body: Body, longitude: f64) -> CelestialPosition {
        CelestialPosition::new(body, longitude)
    }

    #[test]
    fn separation_is_minimal_arc() {
        assert_eq!(angular_separation(10.0, 130.0), 120.0);
        assert_eq!(angular_separation(350.0, 10.0), 20.0);
        assert_eq!(angular_separation(0.0, 180.0), 180.0);
        assert_eq!(angular_separation(90.0, 90.0), 0.0);
    }

    #[test]
    fn exact_trine_consumes_zero_orb() {
        let aspects = detect_internal(
            &[pos(Body::Sun, 10.0), pos(Body::Moon, 130.0)],
            &OrbTable::default_natal(),
        );
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].aspect_type, AspectType::Trine);
        assert_eq!(aspects[0].orb_consumed, 0.0);
        assert_eq!(aspects[0].separation, 120.0);
    }

    #[test]
    fn aspect_outside_orb_is_not_emitted() {
        // 7 degrees off a trine, natal trine orb is 6.
        let aspects = detect_internal(
            &[pos(Body::Sun, 10.0), pos(Body::Moon, 137.0)],
            &OrbTable::default_natal(),
        );
        assert!(aspects.is_empty());
    }

    #[test]
    fn internal_detection_emits_each_pair_once() {
        let positions = [
            pos(Body::Sun, 0.0),
            pos(Body::Moon, 120.0),
            pos(Body::Mars, 240.0),
        ];
        let aspects = detect_internal(&positions, &OrbTable::default_natal());
        // Three trines in a grand trine, each unordered pair exactly once.
        assert_eq!(aspects.len(), 3);
        for aspect in &aspects {
            assert_ne!(aspect.body_a, aspect.body_b);
            assert_eq!(aspect.aspect_type, AspectType::Trine);
        }
    }

    #[test]
    fn cross_detection_examines_all_pairs() {
        let natal = [pos(Body::Sun, 0.0), pos(Body::Moon, 90.0)];
        let cycle = [pos(Body::Sun, 180.0)];
        let aspects = detect_aspects(&natal, &cycle, &OrbTable::default_cross_chart());
        // Natal Sun opposes cycle Sun; natal Moon squares cycle Sun.
        assert_eq!(aspects.len(), 2);
        assert!(aspects
            .iter()
            .any(|a| a.body_a == Body::Sun && a.aspect_type == AspectType::Opposition));
        assert!(aspects
            .iter()
            .any(|a| a.body_a == Body::Moon && a.aspect_type == AspectType::Square));
    }

    #[test]
    fn results_are_ranked_by_consumed_orb() {
        let natal = [pos(Body::Sun, 0.0), pos(Body::Venus, 63.0)];
        let cycle = [pos(Body::Mars, 120.5)];
        let aspects = detect_aspects(&natal, &cycle, &OrbTable::default_cross_chart());
        assert_eq!(aspects.len(), 2);
        assert!(aspects[0].orb_consumed <= aspects[1].orb_consumed);
    }

    #[test]
    fn disabled_types_are_ignored() {
        let table = OrbTable::new().with_orb(AspectType::Square, 6.0);
        let aspects = detect_internal(
            &[pos(Body::Sun, 0.0), pos(Body::Moon, 120.0)],
            &table,
        );
        assert!(aspects.is_empty());
    }

    #[test]
    fn tighter_orb_can_reject_what_wider_accepts() {
        let natal_pair = [pos(Body::Sun, 0.0), pos(Body::Moon, 125.0)];
        let wide = detect_internal(&natal_pair, &OrbTable::default_natal());
        let tight = detect_internal(&natal_pair, &OrbTable::default_cross_chart());
        assert_eq!(wide.len(), 1);
        assert!(tight.is_empty());
    }

    proptest! {
        #[test]
        fn separation_is_symmetric_and_bounded(a in 0.0f64..360.0, b in 0.0f64..360.0) {
            let s = angular_separation(a, b);
            prop_assert!((0.0..=180.0).contains(&s));
            prop_assert!((s - angular_separation(b, a)).abs() < 1e-9);
        }

        #[test]
        fn internal_detection_never_duplicates_pairs(
            longitudes in proptest::collection::vec(0.0f64..360.0, 2..8)
        ) {
            let bodies: Vec<_> = Body::all().collect();
            let positions: Vec<_> = longitudes
                .iter()
                .enumerate()
                .map(|(i, l)| pos(bodies[i], *l))
                .collect();
            let aspects = detect_internal(&positions, &OrbTable::default_natal());
            let mut pairs: Vec<(Body, Body)> = aspects
                .iter()
                .map(|a| {
                    if a.body_a <= a.body_b {
                        (a.body_a, a.body_b)
                    } else {
                        (a.body_b, a.body_a)
                    }
                })
                .collect();
            pairs.sort();
            let before = pairs.len();
            pairs.dedup();
            prop_assert_eq!(before, pairs.len());
        }
    }
}
