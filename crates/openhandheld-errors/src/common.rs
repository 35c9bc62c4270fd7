//! Top-level error type and the classification shared by all crates.

use core::fmt;

use crate::{ConfigError, DeviceError, TargetError};

/// Top-level error wrapping every OpenHandheld sub-error.
#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    /// Physical controller errors
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Virtual target errors
    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tick loop or another owned thread cannot continue
    #[error("Fatal: {0}")]
    Fatal(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl CompanionError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompanionError::Device(_) => ErrorCategory::Device,
            CompanionError::Target(_) => ErrorCategory::Target,
            CompanionError::Config(_) => ErrorCategory::Config,
            CompanionError::Io(_) => ErrorCategory::IO,
            CompanionError::Fatal(_) | CompanionError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CompanionError::Device(e) => e.severity(),
            CompanionError::Target(e) => e.severity(),
            CompanionError::Config(e) => e.severity(),
            CompanionError::Io(_) => ErrorSeverity::Error,
            CompanionError::Fatal(_) => ErrorSeverity::Critical,
            CompanionError::Other(_) => ErrorSeverity::Error,
        }
    }

    /// Check if this error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        CompanionError::Other(msg.into())
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Physical controller errors
    Device = 0,
    /// Virtual target errors
    Target = 1,
    /// Configuration errors
    Config = 2,
    /// I/O errors
    IO = 3,
    /// Other errors
    Other = 255,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Device => write!(f, "Device"),
            ErrorCategory::Target => write!(f, "Target"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::IO => write!(f, "IO"),
            ErrorCategory::Other => write!(f, "Other"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, the current tick is affected
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, the process cannot continue
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Device.to_string(), "Device");
        assert_eq!(ErrorCategory::Target.to_string(), "Target");
        assert_eq!(ErrorCategory::Config.to_string(), "Config");
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Error > ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }

    #[test]
    fn test_companion_error_category() {
        let err: CompanionError = TargetError::InvalidTarget.into();
        assert_eq!(err.category(), ErrorCategory::Target);

        let err: CompanionError = DeviceError::not_found("neptune").into();
        assert_eq!(err.category(), ErrorCategory::Device);
    }

    #[test]
    fn test_only_fatal_is_unrecoverable() {
        assert!(!CompanionError::Fatal("tick thread".into()).is_recoverable());
        assert!(CompanionError::other("pipe closed").is_recoverable());
        let err: CompanionError = DeviceError::Disconnected("deck".into()).into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_companion_error_is_std_error() {
        let err: CompanionError = TargetError::BusNotFound.into();
        let _: &dyn std::error::Error = &err;
    }
}
