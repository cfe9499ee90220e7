//! Activation module - which bodies a cycle chart emphasizes.
//!
//! A body is "activated" for a cycle when the cycle chart places it in a
//! structurally emphatic position relative to the natal chart. Ranking is
//! a pure function of the two charts; nothing here caches or mutates.

use serde::{Deserialize, Serialize};

use crate::domain::aspect::{angular_separation, AspectType};
use crate::domain::chart::{Body, CelestialPosition, Chart};

/// The angular houses: 1st, 4th, 7th, 10th.
const ANGULAR_HOUSES: [u8; 4] = [1, 4, 7, 10];

/// What a cycle body made contact with in the natal chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactTarget {
    Ascendant,
    Midheaven,
    Luminary(Body),
}

impl std::fmt::Display for ContactTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactTarget::Ascendant => write!(f, "natal ascendant"),
            ContactTarget::Midheaven => write!(f, "natal midheaven"),
            ContactTarget::Luminary(body) => write!(f, "natal {}", body),
        }
    }
}

/// The structural reason a body counts as activated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum ActivationReason {
    /// The body occupies an angular house in the cycle chart.
    AngularHouse { house: u8 },
    /// The body conjoins or opposes a natal angle or luminary within the
    /// tight orb.
    NatalContact {
        target: ContactTarget,
        aspect: AspectType,
        orb: f64,
    },
    /// The body repeats its natal house placement in the cycle chart.
    RepeatedHouse { house: u8 },
    /// The body rules the cycle chart's ascendant sign.
    ChartRuler,
}

/// Priority tier of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    /// Two or more structural reasons.
    High,
    /// Exactly one structural reason.
    Medium,
}

/// One activated body with its evidence.
///
/// Derived fresh for each cycle; persisted only inside the interpretation
/// record that embeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    /// The activated body.
    pub body: Body,
    /// Snapshot of the body's natal position.
    pub natal_position: CelestialPosition,
    /// Snapshot of the body's cycle position.
    pub cycle_position: CelestialPosition,
    /// Priority tier derived from the reason count.
    pub tier: PriorityTier,
    /// At least one structural reason, always.
    pub reasons: Vec<ActivationReason>,
}

/// Ranks the bodies a cycle chart activates against the natal chart.
///
/// `tight_orb` bounds the conjunction/opposition contacts of reason (b);
/// it comes from configuration, typically 3 degrees. Bodies with zero
/// reasons are omitted entirely, so every returned record cites at least
/// one reason. Output is ordered by tier, then reason count, then
/// canonical body order.
pub fn rank_activation(natal: &Chart, cycle: &Chart, tight_orb: f64) -> Vec<ActivationRecord> {
    let ruler = cycle.chart_ruler();
    let mut records = Vec::new();

    for cycle_pos in &cycle.positions {
        let body = cycle_pos.body;
        let Some(natal_pos) = natal.position(body) else {
            continue;
        };

        let mut reasons = Vec::new();

        let cycle_house = cycle.houses.assign_house(cycle_pos.longitude);
        if ANGULAR_HOUSES.contains(&cycle_house) {
            reasons.push(ActivationReason::AngularHouse { house: cycle_house });
        }

        for (target, target_lon) in contact_targets(natal) {
            if let Some((aspect, orb)) = tight_contact(cycle_pos.longitude, target_lon, tight_orb)
            {
                reasons.push(ActivationReason::NatalContact {
                    target,
                    aspect,
                    orb,
                });
            }
        }

        let natal_house = natal.houses.assign_house(natal_pos.longitude);
        if natal_house == cycle_house {
            reasons.push(ActivationReason::RepeatedHouse { house: cycle_house });
        }

        if body == ruler {
            reasons.push(ActivationReason::ChartRuler);
        }

        let tier = match reasons.len() {
            0 => continue,
            1 => PriorityTier::Medium,
            _ => PriorityTier::High,
        };

        records.push(ActivationRecord {
            body,
            natal_position: *natal_pos,
            cycle_position: *cycle_pos,
            tier,
            reasons,
        });
    }

    records.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then(b.reasons.len().cmp(&a.reasons.len()))
            .then(a.body.cmp(&b.body))
    });
    records
}

fn contact_targets(natal: &Chart) -> Vec<(ContactTarget, f64)> {
    let mut targets = vec![
        (ContactTarget::Ascendant, natal.ascendant),
        (ContactTarget::Midheaven, natal.midheaven),
    ];
    for body in [Body::Sun, Body::Moon] {
        if let Some(pos) = natal.position(body) {
            targets.push((ContactTarget::Luminary(body), pos.longitude));
        }
    }
    targets
}

/// Conjunction or opposition within the tight orb, if either holds.
fn tight_contact(lon: f64, target: f64, tight_orb: f64) -> Option<(AspectType, f64)> {
    let sep = angular_separation(lon, target);
    if sep <= tight_orb {
        Some((AspectType::Conjunction, sep))
    } else if (180.0 - sep).abs() <= tight_orb {
        Some((AspectType::Opposition, (180.0 - sep).abs()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartKind, EphemerisSnapshot, GeoCoords};
    use crate::domain::foundation::Timestamp;

    const TIGHT_ORB: f64 = 3.0;

    fn chart(kind: ChartKind, ascendant: f64, positions: Vec<CelestialPosition>) -> Chart {
        let cusps: Vec<f64> = (0..12).map(|i| ascendant + 30.0 * i as f64).collect();
        Chart::from_snapshot(
            kind,
            EphemerisSnapshot {
                positions,
                cusps,
                ascendant,
                midheaven: (ascendant + 270.0).rem_euclid(360.0),
            },
            Timestamp::from_unix_secs(0),
            GeoCoords::new(48.85, 2.35),
        )
        .unwrap()
    }

    fn pos(body: Body, longitude: f64) -> CelestialPosition {
        CelestialPosition::new(body, longitude)
    }

    #[test]
    fn angular_house_alone_gives_medium_tier() {
        // Natal Venus in house 2; cycle Venus in house 1, nothing else.
        let natal = chart(
            ChartKind::Natal,
            0.0,
            vec![pos(Body::Sun, 100.0), pos(Body::Moon, 200.0), pos(Body::Venus, 40.0)],
        );
        // Gemini rising so Venus is not the cycle chart-ruler.
        let cycle = chart(ChartKind::Cycle, 60.0, vec![pos(Body::Venus, 70.0)]);

        let records = rank_activation(&natal, &cycle, TIGHT_ORB);
        let venus = records.iter().find(|r| r.body == Body::Venus).unwrap();
        assert_eq!(venus.tier, PriorityTier::Medium);
        assert_eq!(venus.reasons.len(), 1);
        assert!(matches!(
            venus.reasons[0],
            ActivationReason::AngularHouse { house: 1 }
        ));
    }

    #[test]
    fn two_reasons_give_high_tier() {
        // Cycle Mars: angular house 10 and conjunct the natal midheaven.
        let natal = chart(
            ChartKind::Natal,
            0.0,
            vec![pos(Body::Sun, 100.0), pos(Body::Moon, 50.0), pos(Body::Mars, 150.0)],
        );
        // Cycle ascendant 0 (Aries): Mars also rules the cycle chart.
        let cycle = chart(ChartKind::Cycle, 0.0, vec![pos(Body::Mars, 271.0)]);

        let records = rank_activation(&natal, &cycle, TIGHT_ORB);
        let mars = records.iter().find(|r| r.body == Body::Mars).unwrap();
        assert_eq!(mars.tier, PriorityTier::High);
        // Angular house 10, natal MC contact, chart-ruler.
        assert_eq!(mars.reasons.len(), 3);
        assert!(mars
            .reasons
            .iter()
            .any(|r| matches!(r, ActivationReason::ChartRuler)));
        assert!(mars.reasons.iter().any(|r| matches!(
            r,
            ActivationReason::NatalContact {
                target: ContactTarget::Midheaven,
                aspect: AspectType::Conjunction,
                ..
            }
        )));
    }

    #[test]
    fn zero_reason_bodies_are_excluded() {
        let natal = chart(
            ChartKind::Natal,
            0.0,
            vec![pos(Body::Sun, 100.0), pos(Body::Moon, 200.0), pos(Body::Saturn, 75.0)],
        );
        // Cycle Saturn: house 2 (not angular), house differs from natal
        // house 3, far from all natal angles/luminaries, not the ruler.
        let cycle = chart(ChartKind::Cycle, 120.0, vec![pos(Body::Saturn, 165.0)]);

        let records = rank_activation(&natal, &cycle, TIGHT_ORB);
        assert!(records.iter().all(|r| r.body != Body::Saturn));
        for record in &records {
            assert!(!record.reasons.is_empty());
        }
    }

    #[test]
    fn opposition_to_natal_luminary_counts() {
        let natal = chart(
            ChartKind::Natal,
            40.0,
            vec![pos(Body::Sun, 100.0), pos(Body::Moon, 200.0), pos(Body::Jupiter, 330.0)],
        );
        // Cycle Jupiter opposes natal Sun within 2 degrees.
        let cycle = chart(ChartKind::Cycle, 40.0, vec![pos(Body::Jupiter, 278.0)]);

        let records = rank_activation(&natal, &cycle, TIGHT_ORB);
        let jupiter = records.iter().find(|r| r.body == Body::Jupiter).unwrap();
        assert!(jupiter.reasons.iter().any(|r| matches!(
            r,
            ActivationReason::NatalContact {
                target: ContactTarget::Luminary(Body::Sun),
                aspect: AspectType::Opposition,
                ..
            }
        )));
    }

    #[test]
    fn repeated_house_counts_as_a_reason() {
        let natal = chart(
            ChartKind::Natal,
            0.0,
            vec![pos(Body::Sun, 100.0), pos(Body::Moon, 200.0), pos(Body::Neptune, 65.0)],
        );
        // Same house table, Neptune again in house 3.
        let cycle = chart(ChartKind::Cycle, 0.0, vec![pos(Body::Neptune, 80.0)]);

        let records = rank_activation(&natal, &cycle, TIGHT_ORB);
        let neptune = records.iter().find(|r| r.body == Body::Neptune).unwrap();
        assert!(neptune.reasons.iter().any(|r| matches!(
            r,
            ActivationReason::RepeatedHouse { house: 3 }
        )));
    }

    #[test]
    fn ordering_is_tier_then_reason_count_then_body() {
        let natal = chart(
            ChartKind::Natal,
            0.0,
            vec![
                pos(Body::Sun, 100.0),
                pos(Body::Moon, 200.0),
                pos(Body::Mars, 1.0),
                pos(Body::Venus, 40.0),
            ],
        );
        let cycle = chart(
            ChartKind::Cycle,
            0.0,
            vec![
                // Mars: house 1 + chart-ruler + repeated house = High, 3 reasons.
                pos(Body::Mars, 2.0),
                // Venus: angular house 4 only = Medium, 1 reason.
                pos(Body::Venus, 95.0),
            ],
        );

        let records = rank_activation(&natal, &cycle, TIGHT_ORB);
        assert!(records.len() >= 2);
        assert_eq!(records[0].body, Body::Mars);
        assert_eq!(records[0].tier, PriorityTier::High);
        let mars_idx = records.iter().position(|r| r.body == Body::Mars).unwrap();
        let venus_idx = records.iter().position(|r| r.body == Body::Venus).unwrap();
        assert!(mars_idx < venus_idx);
    }

    #[test]
    fn ranking_is_deterministic() {
        let natal = chart(
            ChartKind::Natal,
            10.0,
            vec![pos(Body::Sun, 320.5), pos(Body::Moon, 95.0), pos(Body::Mercury, 310.0)],
        );
        let cycle = chart(
            ChartKind::Cycle,
            190.0,
            vec![pos(Body::Sun, 320.5), pos(Body::Moon, 12.0), pos(Body::Mercury, 330.0)],
        );

        let first = rank_activation(&natal, &cycle, TIGHT_ORB);
        let second = rank_activation(&natal, &cycle, TIGHT_ORB);
        assert_eq!(first, second);
    }
}
