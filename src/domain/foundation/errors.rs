//! Engine error taxonomy.
//!
//! Pure computational failures carry the inputs that caused them and are
//! surfaced immediately; transient I/O failures are retried by the
//! application layer before being converted into `EphemerisUnavailable`.
//! Budget exhaustion and claim conflicts are deliberately absent here:
//! both are ordinary control flow in the interpretation cache, not errors.

use thiserror::Error;

/// Failures surfaced by the chart engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// A house table had fewer than 12 usable cusps. Invalid input; never retried.
    #[error("malformed house table: expected 12 finite cusps, found {found}")]
    MalformedHouseTable {
        /// Number of usable cusps actually present.
        found: usize,
    },

    /// Two consecutive cusps coincide, leaving a zero-width house.
    #[error("malformed house table: house {house} has zero width, its cusps coincide")]
    CoincidentCusps {
        /// The house (1..=12) whose opening and closing cusps coincide.
        house: u8,
    },

    /// The astronomical-data provider stayed unavailable through all retries.
    #[error("ephemeris unavailable after {attempts} attempts: {message}")]
    EphemerisUnavailable {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last provider error.
        message: String,
    },

    /// A chart was asked about a body it does not track.
    #[error("body {body} not tracked in this chart")]
    BodyNotTracked {
        /// The missing body.
        body: String,
    },

    /// The cycle locator found no longitude crossing in the sampled year.
    #[error(
        "no cycle root found for {body} in {year}: natal longitude {natal_longitude}\u{b0} never crossed"
    )]
    NoRootFound {
        /// Body being searched.
        body: String,
        /// Target calendar year.
        year: i32,
        /// Natal reference longitude in degrees.
        natal_longitude: f64,
    },
}

impl EngineError {
    /// Creates a malformed house table error.
    pub fn malformed_house_table(found: usize) -> Self {
        Self::MalformedHouseTable { found }
    }

    /// Creates a coincident-cusps error.
    pub fn coincident_cusps(house: u8) -> Self {
        Self::CoincidentCusps { house }
    }

    /// Creates an ephemeris unavailable error.
    pub fn ephemeris_unavailable(attempts: u32, message: impl Into<String>) -> Self {
        Self::EphemerisUnavailable {
            attempts,
            message: message.into(),
        }
    }

    /// Creates a body-not-tracked error.
    pub fn body_not_tracked(body: impl Into<String>) -> Self {
        Self::BodyNotTracked { body: body.into() }
    }

    /// Creates a no-root-found error.
    pub fn no_root_found(body: impl Into<String>, year: i32, natal_longitude: f64) -> Self {
        Self::NoRootFound {
            body: body.into(),
            year,
            natal_longitude,
        }
    }
}
