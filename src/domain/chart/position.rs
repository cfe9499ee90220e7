//! Sign partition and position resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Body;

/// One of the 12 equal 30-degree divisions of ecliptic longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Derives the sign from an ecliptic longitude.
    ///
    /// Total over all real inputs: the longitude is normalized with
    /// `rem_euclid(360.0)` first, so negative and >360 values work.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        let index = (normalized / 30.0).floor() as usize;
        Self::from_index(index % 12)
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => ZodiacSign::Aries,
            1 => ZodiacSign::Taurus,
            2 => ZodiacSign::Gemini,
            3 => ZodiacSign::Cancer,
            4 => ZodiacSign::Leo,
            5 => ZodiacSign::Virgo,
            6 => ZodiacSign::Libra,
            7 => ZodiacSign::Scorpio,
            8 => ZodiacSign::Sagittarius,
            9 => ZodiacSign::Capricorn,
            10 => ZodiacSign::Aquarius,
            _ => ZodiacSign::Pisces,
        }
    }

    /// Zero-based index of the sign (Aries = 0).
    pub fn index(&self) -> usize {
        match self {
            ZodiacSign::Aries => 0,
            ZodiacSign::Taurus => 1,
            ZodiacSign::Gemini => 2,
            ZodiacSign::Cancer => 3,
            ZodiacSign::Leo => 4,
            ZodiacSign::Virgo => 5,
            ZodiacSign::Libra => 6,
            ZodiacSign::Scorpio => 7,
            ZodiacSign::Sagittarius => 8,
            ZodiacSign::Capricorn => 9,
            ZodiacSign::Aquarius => 10,
            ZodiacSign::Pisces => 11,
        }
    }

    /// Modern ruling body of this sign.
    pub fn ruler(&self) -> Body {
        match self {
            ZodiacSign::Aries => Body::Mars,
            ZodiacSign::Taurus => Body::Venus,
            ZodiacSign::Gemini => Body::Mercury,
            ZodiacSign::Cancer => Body::Moon,
            ZodiacSign::Leo => Body::Sun,
            ZodiacSign::Virgo => Body::Mercury,
            ZodiacSign::Libra => Body::Venus,
            ZodiacSign::Scorpio => Body::Pluto,
            ZodiacSign::Sagittarius => Body::Jupiter,
            ZodiacSign::Capricorn => Body::Saturn,
            ZodiacSign::Aquarius => Body::Uranus,
            ZodiacSign::Pisces => Body::Neptune,
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        };
        write!(f, "{}", name)
    }
}

/// A longitude expressed in traditional sign notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignPosition {
    /// The sign containing the longitude.
    pub sign: ZodiacSign,
    /// Whole degrees within the sign (0..=29), truncated.
    pub degree: u8,
    /// Whole arc-minutes within the degree (0..=59), truncated.
    pub minutes: u8,
}

/// Resolves a raw ecliptic longitude into sign notation.
///
/// Pure and total: any finite longitude is first normalized modulo 360.
/// Degrees and minutes always truncate, never round: 23°59′ stays 23°59′
/// until the full next minute is reached.
pub fn resolve(longitude: f64) -> SignPosition {
    let normalized = longitude.rem_euclid(360.0);
    let in_sign = normalized % 30.0;
    let degree = in_sign.floor();
    let minutes = ((in_sign - degree) * 60.0).floor();

    SignPosition {
        sign: ZodiacSign::from_longitude(normalized),
        degree: degree as u8,
        // Guard the float edge where (x - floor(x)) * 60 lands on 60.0.
        minutes: (minutes as u8).min(59),
    }
}

impl fmt::Display for SignPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{b0}{:02}\u{2032} {}", self.degree, self.minutes, self.sign)
    }
}

/// A body's place on the ecliptic at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    /// The body this position belongs to.
    pub body: Body,
    /// Ecliptic longitude, normalized into [0, 360).
    pub longitude: f64,
    /// Ecliptic latitude in degrees, if the provider supplies it.
    pub latitude: Option<f64>,
    /// Longitude speed in degrees per day; negative means retrograde.
    pub speed: Option<f64>,
}

impl CelestialPosition {
    /// Creates a position, normalizing the longitude into [0, 360).
    pub fn new(body: Body, longitude: f64) -> Self {
        Self {
            body,
            longitude: longitude.rem_euclid(360.0),
            latitude: None,
            speed: None,
        }
    }

    /// Attaches ecliptic latitude.
    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }

    /// Attaches longitude speed in degrees per day.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sign containing this position.
    pub fn sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.longitude)
    }

    /// Position in traditional sign notation.
    pub fn sign_position(&self) -> SignPosition {
        resolve(self.longitude)
    }

    /// True when the body is moving backwards through the zodiac.
    ///
    /// Unknown speed is treated as prograde.
    pub fn is_retrograde(&self) -> bool {
        self.speed.is_some_and(|s| s < 0.0)
    }
}
