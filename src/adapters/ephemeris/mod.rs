//! Ephemeris adapters.

mod mean_sun;

pub use mean_sun::MeanMotionEphemeris;
