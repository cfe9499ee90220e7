//! EphemerisProvider port - Interface to the astronomical-data provider.
//!
//! Given a moment and geographic coordinates the provider returns raw
//! longitudes for all tracked bodies plus the 12 house cusps and the
//! ascendant/midheaven angles. The engine never caches this raw output
//! beyond the lifetime of the one chart built from it.
//!
//! The trait is synchronous: ephemeris libraries compute locally or over
//! blocking FFI, and the root finder evaluates it in a tight loop. The
//! application layer wraps calls in its own bounded retry.

use thiserror::Error;

use crate::domain::chart::{Body, EphemerisSnapshot, GeoCoords};
use crate::domain::foundation::Timestamp;

/// Port for astronomical position data.
pub trait EphemerisProvider: Send + Sync {
    /// Full snapshot (positions, cusps, angles) for one moment and place.
    fn snapshot(
        &self,
        at: Timestamp,
        coords: GeoCoords,
    ) -> Result<EphemerisSnapshot, EphemerisError>;

    /// A single body's ecliptic longitude at a moment.
    ///
    /// Used by the cycle locator, which needs many cheap evaluations and
    /// no houses.
    fn body_longitude(&self, body: Body, at: Timestamp) -> Result<f64, EphemerisError>;
}

/// Ephemeris provider errors.
#[derive(Debug, Clone, Error)]
pub enum EphemerisError {
    /// Provider is temporarily unreachable.
    #[error("ephemeris provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Request timed out.
    #[error("ephemeris request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// The moment lies outside the provider's covered range.
    #[error("timestamp {at} outside ephemeris coverage")]
    OutOfRange {
        /// The rejected moment.
        at: Timestamp,
    },

    /// The provider returned data the engine could not use.
    #[error("invalid ephemeris data: {0}")]
    InvalidData(String),
}

impl EphemerisError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// True if the call may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EphemerisError::Unavailable { .. } | EphemerisError::Timeout { .. }
        )
    }
}
