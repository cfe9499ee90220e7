//! The Chart aggregate and the raw ephemeris snapshot it is built from.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EngineError, Timestamp};

use super::{Body, CelestialPosition, HouseTable, ZodiacSign};

/// What kind of chart this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Cast for the subject's birth moment.
    Natal,
    /// Cast for a yearly return moment.
    Cycle,
    /// Cast for a symbolically progressed moment.
    Progressed,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChartKind::Natal => "natal",
            ChartKind::Cycle => "cycle",
            ChartKind::Progressed => "progressed",
        };
        write!(f, "{}", s)
    }
}

/// Geographic coordinates a chart is cast for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoords {
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl GeoCoords {
    /// Creates geographic coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Raw output of the astronomical-data provider for one moment and place.
///
/// Never cached beyond the lifetime of the one [`Chart`] built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSnapshot {
    /// Longitudes (and optional latitude/speed) for all tracked bodies.
    pub positions: Vec<CelestialPosition>,
    /// The 12 house cusp longitudes in ecliptic order.
    pub cusps: Vec<f64>,
    /// Ascendant longitude in degrees.
    pub ascendant: f64,
    /// Midheaven longitude in degrees.
    pub midheaven: f64,
}

/// An immutable computed chart.
///
/// Owned by the subject it was generated for; once built it is never
/// mutated, only superseded by computing a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Chart kind tag.
    pub kind: ChartKind,
    /// Body positions in canonical body order.
    pub positions: Vec<CelestialPosition>,
    /// Ascendant longitude, normalized.
    pub ascendant: f64,
    /// Midheaven longitude, normalized.
    pub midheaven: f64,
    /// House cusp table.
    pub houses: HouseTable,
    /// Moment the chart is cast for.
    pub cast_at: Timestamp,
    /// Place the chart is cast for.
    pub coords: GeoCoords,
}

impl Chart {
    /// Builds a chart from a raw ephemeris snapshot.
    ///
    /// Fails with [`EngineError::MalformedHouseTable`] when the snapshot
    /// does not carry 12 usable cusps.
    pub fn from_snapshot(
        kind: ChartKind,
        snapshot: EphemerisSnapshot,
        cast_at: Timestamp,
        coords: GeoCoords,
    ) -> Result<Self, EngineError> {
        let houses = HouseTable::new(&snapshot.cusps)?;
        Ok(Self {
            kind,
            positions: snapshot.positions,
            ascendant: snapshot.ascendant.rem_euclid(360.0),
            midheaven: snapshot.midheaven.rem_euclid(360.0),
            houses,
            cast_at,
            coords,
        })
    }

    /// Position of a body in this chart, if tracked.
    pub fn position(&self, body: Body) -> Option<&CelestialPosition> {
        self.positions.iter().find(|p| p.body == body)
    }

    /// House number (1..=12) a body falls in, if tracked.
    pub fn house_of(&self, body: Body) -> Option<u8> {
        self.position(body)
            .map(|p| self.houses.assign_house(p.longitude))
    }

    /// Sign on the ascendant.
    pub fn ascendant_sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.ascendant)
    }

    /// The body ruling the ascendant sign (the chart-ruler).
    pub fn chart_ruler(&self) -> Body {
        self.ascendant_sign().ruler()
    }

    /// Longitudes of the two chart angles (ascendant, midheaven).
    pub fn angles(&self) -> [f64; 2] {
        [self.ascendant, self.midheaven]
    }
}
