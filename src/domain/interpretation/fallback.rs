//! Deterministic fallback narrative.
//!
//! When the generation budget is exhausted or the narrative provider keeps
//! failing, the subject still receives a valid payload built purely from
//! the structural facts in the content key. Same key, same output.

use crate::domain::activation::{ActivationReason, PriorityTier};
use crate::domain::chart::ChartKind;

use super::{ContentKey, InterpretationPayload, Section};

/// Renders a templated payload from the content key.
pub fn render_fallback(key: &ContentKey) -> InterpretationPayload {
    let sections = build_sections(key);
    let summary = build_summary(key);

    match key.chart_kind {
        ChartKind::Natal => InterpretationPayload::Natal { summary, sections },
        ChartKind::Cycle => InterpretationPayload::Cycle {
            summary,
            year: key.cycle_id,
            activated_bodies: key
                .activations
                .iter()
                .map(|a| a.body.to_string())
                .collect(),
            sections,
        },
        ChartKind::Progressed => InterpretationPayload::Progressed { summary, sections },
    }
}

fn build_summary(key: &ContentKey) -> String {
    let high: Vec<String> = key
        .activations
        .iter()
        .filter(|a| a.tier == PriorityTier::High)
        .map(|a| a.body.to_string())
        .collect();

    match key.chart_kind {
        ChartKind::Natal => format!(
            "Structural reading of the natal chart for {}.",
            key.subject_label
        ),
        ChartKind::Cycle if high.is_empty() => format!(
            "The {} cycle for {} carries no single dominant emphasis; its themes unfold evenly.",
            key.cycle_id, key.subject_label
        ),
        ChartKind::Cycle => format!(
            "The {} cycle for {} is carried by {}.",
            key.cycle_id,
            key.subject_label,
            high.join(", ")
        ),
        ChartKind::Progressed => format!(
            "Progressed reading for {}.",
            key.subject_label
        ),
    }
}

fn build_sections(key: &ContentKey) -> Vec<Section> {
    let mut sections = Vec::new();

    for activation in &key.activations {
        let mut lines = Vec::new();
        for reason in &activation.reasons {
            lines.push(describe_reason(reason));
        }
        let natal = activation.natal_position.sign_position();
        let cycle = activation.cycle_position.sign_position();
        sections.push(Section::new(
            activation.body.to_string(),
            format!(
                "{} moves from natal {} to {}. {}",
                activation.body,
                natal,
                cycle,
                lines.join(" ")
            ),
        ));
    }

    if !key.key_aspects.is_empty() {
        let lines: Vec<String> = key
            .key_aspects
            .iter()
            .map(|a| {
                format!(
                    "{} {} {} within {:.1}\u{b0}.",
                    a.body_a, a.aspect, a.body_b, a.orb_consumed
                )
            })
            .collect();
        sections.push(Section::new("Key aspects", lines.join(" ")));
    }

    sections
}

fn describe_reason(reason: &ActivationReason) -> String {
    match reason {
        ActivationReason::AngularHouse { house } => {
            format!("It stands angular in house {}.", house)
        }
        ActivationReason::NatalContact {
            target,
            aspect,
            orb,
        } => format!(
            "It forms a {} to the {} within {:.1}\u{b0}.",
            aspect, target, orb
        ),
        ActivationReason::RepeatedHouse { house } => {
            format!("It repeats its natal placement in house {}.", house)
        }
        ActivationReason::ChartRuler => "It rules the chart's ascendant.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activation::ActivationRecord;
    use crate::domain::chart::{Body, CelestialPosition};

    fn cycle_key() -> ContentKey {
        let activation = ActivationRecord {
            body: Body::Mars,
            natal_position: CelestialPosition::new(Body::Mars, 150.0),
            cycle_position: CelestialPosition::new(Body::Mars, 271.0),
            tier: PriorityTier::High,
            reasons: vec![
                ActivationReason::AngularHouse { house: 10 },
                ActivationReason::ChartRuler,
            ],
        };
        ContentKey::new("Ada", ChartKind::Cycle, 2025).with_activations(vec![activation])
    }

    #[test]
    fn fallback_is_deterministic() {
        let key = cycle_key();
        assert_eq!(render_fallback(&key), render_fallback(&key));
    }

    #[test]
    fn cycle_fallback_names_the_high_tier_bodies() {
        let payload = render_fallback(&cycle_key());
        match payload {
            InterpretationPayload::Cycle {
                summary,
                year,
                activated_bodies,
                sections,
            } => {
                assert!(summary.contains("Mars"));
                assert!(summary.contains("2025"));
                assert_eq!(year, 2025);
                assert_eq!(activated_bodies, vec!["Mars".to_string()]);
                assert_eq!(sections.len(), 1);
                assert!(sections[0].text.contains("house 10"));
                assert!(sections[0].text.contains("ascendant"));
            }
            other => panic!("expected cycle payload, got {other:?}"),
        }
    }

    #[test]
    fn natal_fallback_has_natal_shape() {
        let key = ContentKey::new("Ada", ChartKind::Natal, 1);
        let payload = render_fallback(&key);
        assert!(matches!(payload, InterpretationPayload::Natal { .. }));
    }

    #[test]
    fn empty_cycle_key_still_produces_a_summary() {
        let key = ContentKey::new("Ada", ChartKind::Cycle, 2030);
        let payload = render_fallback(&key);
        assert!(!payload.summary().is_empty());
    }
}
