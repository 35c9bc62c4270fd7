//! Convenience re-exports for error handling.

pub use crate::Result;
pub use crate::common::{CompanionError, ErrorCategory, ErrorSeverity};
pub use crate::config::ConfigError;
pub use crate::device::DeviceError;
pub use crate::target::TargetError;
