//! Configuration load and validation errors.

use crate::common::ErrorSeverity;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A field is outside its allowed range
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        /// Field path
        field: String,
        /// Offending value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// A field holds a value that is never valid
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Field path
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// The document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigError::OutOfRange { .. } | ConfigError::Invalid { .. } => ErrorSeverity::Error,
            ConfigError::Parse(_) => ErrorSeverity::Error,
        }
    }

    /// Create an out of range error.
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// Create an invalid value error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check `value` against an inclusive range.
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
        if value.is_nan() || value < min || value > max {
            return Err(ConfigError::out_of_range(field, value, min, max));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(ConfigError::check_range("vibration_strength", 0.5, 0.0, 1.0).is_ok());
        assert_eq!(
            ConfigError::check_range("vibration_strength", 1.5, 0.0, 1.0),
            Err(ConfigError::out_of_range("vibration_strength", 1.5, 0.0, 1.0))
        );
        assert!(ConfigError::check_range("x", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ConfigError::out_of_range("tick_interval_ms", 0.0, 1.0, 100.0);
        assert_eq!(
            err.to_string(),
            "tick_interval_ms must be within 1..=100, got 0"
        );
    }
}
