//! Aspect enumeration and orb configuration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::chart::Body;

/// A recognized angular relationship between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    SemiSextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

impl AspectType {
    /// Exact angle of this aspect in degrees.
    pub fn exact_angle(&self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::SemiSextile => 30.0,
            AspectType::Sextile => 60.0,
            AspectType::Square => 90.0,
            AspectType::Trine => 120.0,
            AspectType::Quincunx => 150.0,
            AspectType::Opposition => 180.0,
        }
    }

    /// The five classical major aspects.
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            AspectType::Conjunction
                | AspectType::Sextile
                | AspectType::Square
                | AspectType::Trine
                | AspectType::Opposition
        )
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AspectType::Conjunction => "conjunction",
            AspectType::SemiSextile => "semi-sextile",
            AspectType::Sextile => "sextile",
            AspectType::Square => "square",
            AspectType::Trine => "trine",
            AspectType::Quincunx => "quincunx",
            AspectType::Opposition => "opposition",
        };
        write!(f, "{}", name)
    }
}

/// Maximum allowed orb per aspect type.
///
/// An absent entry disables the type entirely, which is how minor aspects
/// stay opt-in. Callers hand a tighter table for cross-chart comparison
/// than for natal-internal detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbTable {
    orbs: BTreeMap<AspectType, f64>,
}

/// Classical orbs for natal-internal detection.
static DEFAULT_NATAL: Lazy<OrbTable> = Lazy::new(|| {
    OrbTable::new()
        .with_orb(AspectType::Conjunction, 8.0)
        .with_orb(AspectType::Sextile, 4.0)
        .with_orb(AspectType::Square, 6.0)
        .with_orb(AspectType::Trine, 6.0)
        .with_orb(AspectType::Opposition, 8.0)
});

/// Tighter orbs for chart-to-chart comparison.
static DEFAULT_CROSS: Lazy<OrbTable> = Lazy::new(|| {
    OrbTable::new()
        .with_orb(AspectType::Conjunction, 5.0)
        .with_orb(AspectType::Sextile, 3.0)
        .with_orb(AspectType::Square, 4.0)
        .with_orb(AspectType::Trine, 4.0)
        .with_orb(AspectType::Opposition, 5.0)
});

impl OrbTable {
    /// Creates an empty orb table (all aspect types disabled).
    pub fn new() -> Self {
        Self {
            orbs: BTreeMap::new(),
        }
    }

    /// Classical major-aspect orbs for natal-internal detection.
    pub fn default_natal() -> Self {
        DEFAULT_NATAL.clone()
    }

    /// Tightened major-aspect orbs for cross-chart comparison.
    pub fn default_cross_chart() -> Self {
        DEFAULT_CROSS.clone()
    }

    /// Sets the maximum orb for an aspect type.
    pub fn with_orb(mut self, aspect: AspectType, max_orb: f64) -> Self {
        self.orbs.insert(aspect, max_orb);
        self
    }

    /// Removes an aspect type from detection.
    pub fn without(mut self, aspect: AspectType) -> Self {
        self.orbs.remove(&aspect);
        self
    }

    /// Maximum orb for an aspect type, if enabled.
    pub fn orb(&self, aspect: AspectType) -> Option<f64> {
        self.orbs.get(&aspect).copied()
    }

    /// Enabled aspect types with their orbs.
    pub fn entries(&self) -> impl Iterator<Item = (AspectType, f64)> + '_ {
        self.orbs.iter().map(|(a, o)| (*a, *o))
    }
}

impl Default for OrbTable {
    fn default() -> Self {
        Self::default_natal()
    }
}

/// A detected aspect between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    /// Body from the first position set.
    pub body_a: Body,
    /// Body from the second position set.
    pub body_b: Body,
    /// The matched aspect type.
    pub aspect_type: AspectType,
    /// Measured minimal angular separation in degrees.
    pub separation: f64,
    /// Maximum orb that was allowed for the type.
    pub orb_allowed: f64,
    /// Distance from the exact angle actually consumed.
    pub orb_consumed: f64,
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (orb {:.2}\u{b0})",
            self.body_a, self.aspect_type, self.body_b, self.orb_consumed
        )
    }
}
