//! Chart module - bodies, signs, positions, houses, and the Chart aggregate.

mod body;
mod chart;
mod houses;
mod position;

pub use body::Body;
pub use chart::{Chart, ChartKind, EphemerisSnapshot, GeoCoords};
pub use houses::HouseTable;
pub use position::{resolve, CelestialPosition, SignPosition, ZodiacSign};
