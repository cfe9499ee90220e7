//! Orb configuration.
//!
//! Orbs are configuration, not constants: callers may tighten or widen
//! any table, and cross-chart comparison conventionally runs tighter than
//! natal-internal detection.

use serde::Deserialize;

use crate::domain::aspect::{AspectType, OrbTable};

use super::error::ValidationError;

/// Maximum orbs per aspect type for one detection context.
///
/// The minor aspects are optional; leaving them unset keeps them disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct AspectOrbs {
    #[serde(default = "default_conjunction")]
    pub conjunction: f64,
    #[serde(default)]
    pub semi_sextile: Option<f64>,
    #[serde(default = "default_sextile")]
    pub sextile: f64,
    #[serde(default = "default_square")]
    pub square: f64,
    #[serde(default = "default_trine")]
    pub trine: f64,
    #[serde(default)]
    pub quincunx: Option<f64>,
    #[serde(default = "default_opposition")]
    pub opposition: f64,
}

fn default_conjunction() -> f64 {
    8.0
}

fn default_sextile() -> f64 {
    4.0
}

fn default_square() -> f64 {
    6.0
}

fn default_trine() -> f64 {
    6.0
}

fn default_opposition() -> f64 {
    8.0
}

impl Default for AspectOrbs {
    fn default() -> Self {
        Self {
            conjunction: default_conjunction(),
            semi_sextile: None,
            sextile: default_sextile(),
            square: default_square(),
            trine: default_trine(),
            quincunx: None,
            opposition: default_opposition(),
        }
    }
}

impl AspectOrbs {
    /// Cross-chart defaults, tighter than the natal table.
    pub fn cross_chart_defaults() -> Self {
        Self {
            conjunction: 5.0,
            semi_sextile: None,
            sextile: 3.0,
            square: 4.0,
            trine: 4.0,
            quincunx: None,
            opposition: 5.0,
        }
    }

    /// Builds the detection table the aspect detector consumes.
    pub fn to_table(&self) -> OrbTable {
        let mut table = OrbTable::new()
            .with_orb(AspectType::Conjunction, self.conjunction)
            .with_orb(AspectType::Sextile, self.sextile)
            .with_orb(AspectType::Square, self.square)
            .with_orb(AspectType::Trine, self.trine)
            .with_orb(AspectType::Opposition, self.opposition);
        if let Some(orb) = self.semi_sextile {
            table = table.with_orb(AspectType::SemiSextile, orb);
        }
        if let Some(orb) = self.quincunx {
            table = table.with_orb(AspectType::Quincunx, orb);
        }
        table
    }

    fn validate(&self, context: &'static str) -> Result<(), ValidationError> {
        let named = [
            ("conjunction", self.conjunction),
            ("sextile", self.sextile),
            ("square", self.square),
            ("trine", self.trine),
            ("opposition", self.opposition),
        ];
        for (_, value) in named {
            if value < 0.0 {
                return Err(ValidationError::NotPositive {
                    field: context,
                    value,
                });
            }
            // Aspect angles sit 30 degrees apart; an orb of 15 or more
            // makes neighboring types ambiguous.
            if value >= 15.0 {
                return Err(ValidationError::OrbTooWide {
                    field: context,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Orb configuration for both detection contexts plus the activation orb.
#[derive(Debug, Clone, Deserialize)]
pub struct OrbConfig {
    /// Orbs for natal-internal detection.
    #[serde(default)]
    pub natal: AspectOrbs,

    /// Orbs for chart-to-chart comparison.
    #[serde(default = "AspectOrbs::cross_chart_defaults")]
    pub cross_chart: AspectOrbs,

    /// Tight orb bounding activation contacts (conjunction/opposition to
    /// natal angles and luminaries).
    #[serde(default = "default_activation_tight_orb")]
    pub activation_tight_orb: f64,
}

fn default_activation_tight_orb() -> f64 {
    3.0
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            natal: AspectOrbs::default(),
            cross_chart: AspectOrbs::cross_chart_defaults(),
            activation_tight_orb: default_activation_tight_orb(),
        }
    }
}

impl OrbConfig {
    /// Validates all orb values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.natal.validate("orbs.natal")?;
        self.cross_chart.validate("orbs.cross_chart")?;
        if self.activation_tight_orb <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "orbs.activation_tight_orb",
                value: self.activation_tight_orb,
            });
        }
        Ok(())
    }
}
