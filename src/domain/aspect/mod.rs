//! Aspect module - angular relationships between chart positions.

mod detector;
mod types;

pub use detector::{angular_separation, detect_aspects, detect_internal};
pub use types::{Aspect, AspectType, OrbTable};
