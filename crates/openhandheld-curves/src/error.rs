//! Error types for curve operations.

use std::fmt;

/// Error type for curve construction and validation.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A sensitivity node lies outside `[0,1]` on x or `[0,2]` on y.
    NodeOutOfRange {
        /// Index of the node in the curve.
        index: usize,
        /// Which coordinate is out of range ("x" or "y").
        coordinate: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// Invalid curve configuration, e.g. an empty node list or a
    /// non-positive exponent.
    InvalidConfiguration(String),
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeOutOfRange {
                index,
                coordinate,
                value,
            } => {
                write!(
                    f,
                    "Sensitivity node {} {} coordinate {} is outside its valid range",
                    index, coordinate, value
                )
            }
            Self::InvalidConfiguration(msg) => {
                write!(f, "Invalid curve configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for CurveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_node() {
        let err = CurveError::NodeOutOfRange {
            index: 3,
            coordinate: "x",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "Sensitivity node 3 x coordinate 1.5 is outside its valid range"
        );
    }

    #[test]
    fn test_error_display_configuration() {
        let err = CurveError::InvalidConfiguration("empty".into());
        assert_eq!(err.to_string(), "Invalid curve configuration: empty");
    }
}
