//! Structured content key handed to the narrative provider.

use serde::{Deserialize, Serialize};

use crate::domain::activation::ActivationRecord;
use crate::domain::aspect::Aspect;
use crate::domain::chart::ChartKind;

/// One aspect reduced to the facts a narrative needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSummary {
    pub body_a: String,
    pub body_b: String,
    pub aspect: String,
    pub orb_consumed: f64,
}

impl From<&Aspect> for AspectSummary {
    fn from(aspect: &Aspect) -> Self {
        Self {
            body_a: aspect.body_a.to_string(),
            body_b: aspect.body_b.to_string(),
            aspect: aspect.aspect_type.to_string(),
            orb_consumed: aspect.orb_consumed,
        }
    }
}

/// The structural facts a narrative is generated from.
///
/// Doubles as the input to the deterministic fallback template, so a
/// subject always receives content shaped by the same facts whether or
/// not the provider was reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentKey {
    /// Display label for the subject (not an identifier).
    pub subject_label: String,
    /// Chart kind the narrative covers.
    pub chart_kind: ChartKind,
    /// Cycle identifier (target year, or birth-data version for natal).
    pub cycle_id: i32,
    /// Activated bodies with their evidence, highest priority first.
    pub activations: Vec<ActivationRecord>,
    /// The tightest aspects worth narrating.
    pub key_aspects: Vec<AspectSummary>,
}

impl ContentKey {
    /// Creates a content key.
    pub fn new(
        subject_label: impl Into<String>,
        chart_kind: ChartKind,
        cycle_id: i32,
    ) -> Self {
        Self {
            subject_label: subject_label.into(),
            chart_kind,
            cycle_id,
            activations: Vec::new(),
            key_aspects: Vec::new(),
        }
    }

    /// Attaches activation records.
    pub fn with_activations(mut self, activations: Vec<ActivationRecord>) -> Self {
        self.activations = activations;
        self
    }

    /// Attaches key aspects.
    pub fn with_aspects(mut self, aspects: &[Aspect]) -> Self {
        self.key_aspects = aspects.iter().map(AspectSummary::from).collect();
        self
    }
}
