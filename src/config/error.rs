//! Configuration error types.

use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment parsing or deserialization failed.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Loaded values failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Validation failures for loaded configuration values.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A value that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// An orb wide enough to overlap neighboring aspect angles.
    #[error("{field} orb of {value} degrees would overlap adjacent aspect angles")]
    OrbTooWide {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_field_and_value() {
        let err = ValidationError::NotPositive {
            field: "cycle.tolerance_seconds",
            value: 0.0,
        };
        assert!(err.to_string().contains("cycle.tolerance_seconds"));
    }
}
