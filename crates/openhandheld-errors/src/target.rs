//! Virtual bus and virtual target errors.

use crate::common::ErrorSeverity;

/// Errors raised while connecting or feeding a virtual gamepad.
///
/// The tick driver logs every one of these and skips the current report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// The virtual bus driver is not installed or not running
    #[error("Virtual bus not found")]
    BusNotFound,

    /// The target was never connected or has been removed from the bus
    #[error("Invalid virtual target")]
    InvalidTarget,

    /// The bus refused to allocate another target
    #[error("No free virtual target slot")]
    NoFreeSlot,

    /// The bus rejected the submitted report
    #[error("Report submission failed: {0}")]
    SubmitFailed(String),
}

impl TargetError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TargetError::BusNotFound => ErrorSeverity::Error,
            TargetError::InvalidTarget => ErrorSeverity::Warning,
            TargetError::NoFreeSlot => ErrorSeverity::Error,
            TargetError::SubmitFailed(_) => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_errors_are_not_critical() {
        for err in [
            TargetError::BusNotFound,
            TargetError::InvalidTarget,
            TargetError::NoFreeSlot,
            TargetError::SubmitFailed("busy".into()),
        ] {
            assert!(err.severity() < ErrorSeverity::Critical, "{err}");
        }
    }
}
