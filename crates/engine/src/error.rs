//! Engine error type.

use openhandheld_errors::{CompanionError, ConfigError, DeviceError, ErrorSeverity, TargetError};
use openhandheld_ipc::IpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Virtual target error: {0}")]
    Target(#[from] TargetError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipe error: {0}")]
    Ipc(#[from] IpcError),

    #[error("Failed to spawn tick thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Tick thread panicked")]
    TickThreadPanicked,
}

impl EngineError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Device(e) => e.severity(),
            EngineError::Target(e) => e.severity(),
            EngineError::Config(e) => e.severity(),
            EngineError::Ipc(e) if e.is_recoverable() => ErrorSeverity::Warning,
            EngineError::Ipc(_) => ErrorSeverity::Error,
            EngineError::Spawn(_) | EngineError::TickThreadPanicked => ErrorSeverity::Critical,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for CompanionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Device(e) => CompanionError::Device(e),
            EngineError::Target(e) => CompanionError::Target(e),
            EngineError::Config(e) => CompanionError::Config(e),
            EngineError::Ipc(e) => CompanionError::Other(format!("Pipe error: {e}")),
            EngineError::Spawn(e) => CompanionError::Fatal(format!("Failed to spawn tick thread: {e}")),
            EngineError::TickThreadPanicked => CompanionError::Fatal("Tick thread panicked".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhandheld_errors::ErrorCategory;

    #[test]
    fn device_errors_keep_their_category() {
        let err = CompanionError::from(EngineError::Device(DeviceError::not_found("xinput user any")));
        assert_eq!(err.category(), ErrorCategory::Device);
        assert!(err.is_recoverable());
    }

    #[test]
    fn thread_failures_are_fatal() {
        let spawn = EngineError::Spawn(std::io::Error::other("no threads left"));
        assert_eq!(spawn.severity(), ErrorSeverity::Critical);
        for err in [spawn, EngineError::TickThreadPanicked] {
            let err = CompanionError::from(err);
            assert!(!err.is_recoverable(), "{err}");
            assert_eq!(err.severity(), ErrorSeverity::Critical);
        }
    }
}
