//! Tracked celestial bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A celestial body tracked by the engine.
///
/// The variant order is the traditional Chaldean-to-modern listing and is
/// used as the final tie-break when sorting activation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// All tracked bodies in canonical order.
    pub fn all() -> impl Iterator<Item = Body> {
        [
            Body::Sun,
            Body::Moon,
            Body::Mercury,
            Body::Venus,
            Body::Mars,
            Body::Jupiter,
            Body::Saturn,
            Body::Uranus,
            Body::Neptune,
            Body::Pluto,
        ]
        .into_iter()
    }

    /// The Sun and Moon are the luminaries.
    pub fn is_luminary(&self) -> bool {
        matches!(self, Body::Sun | Body::Moon)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_ten_bodies_in_order() {
        let bodies: Vec<_> = Body::all().collect();
        assert_eq!(bodies.len(), 10);
        assert_eq!(bodies[0], Body::Sun);
        assert_eq!(bodies[9], Body::Pluto);
    }

    #[test]
    fn only_sun_and_moon_are_luminaries() {
        assert!(Body::Sun.is_luminary());
        assert!(Body::Moon.is_luminary());
        assert!(!Body::Venus.is_luminary());
        assert!(!Body::Pluto.is_luminary());
    }
}
