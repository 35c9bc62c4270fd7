//! Physical controller errors.
//!
//! None of these are fatal. An adapter that hits one logs it, drops back to
//! the disconnected state and is retried on a later attach or tick.

use crate::common::ErrorSeverity;

/// Physical controller errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    /// Device not found
    #[error("Device not found: {0}")]
    NotFound(String),

    /// Device disconnected
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// Opening the device handle failed
    #[error("Failed to open device {device}: {reason}")]
    OpenFailed {
        /// Device identifier
        device: String,
        /// Failure reason
        reason: String,
    },

    /// HID transport error
    #[error("HID error: {0}")]
    HidError(String),

    /// Device timeout
    #[error("Device {device} timeout after {timeout_ms}ms")]
    Timeout {
        /// Device identifier
        device: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Unsupported device
    #[error("Unsupported device: vendor={vendor_id:#06x}, product={product_id:#06x}")]
    UnsupportedDevice {
        /// USB vendor ID
        vendor_id: u16,
        /// USB product ID
        product_id: u16,
    },

    /// Device is busy with a lifecycle transition
    #[error("Device {0} is busy")]
    Busy(String),

    /// The vendor SDK did not answer in time or reported a failure
    #[error("Vendor SDK call {call} failed: {message}")]
    VendorSdk {
        /// SDK entry point
        call: String,
        /// Error message
        message: String,
    },
}

impl DeviceError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DeviceError::NotFound(_) => ErrorSeverity::Error,
            DeviceError::Disconnected(_) => ErrorSeverity::Warning,
            DeviceError::OpenFailed { .. } => ErrorSeverity::Error,
            DeviceError::HidError(_) => ErrorSeverity::Error,
            DeviceError::Timeout { .. } => ErrorSeverity::Warning,
            DeviceError::UnsupportedDevice { .. } => ErrorSeverity::Info,
            DeviceError::Busy(_) => ErrorSeverity::Warning,
            DeviceError::VendorSdk { .. } => ErrorSeverity::Warning,
        }
    }

    /// Check if this error indicates the device is unavailable.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(
            self,
            DeviceError::NotFound(_) | DeviceError::Disconnected(_) | DeviceError::OpenFailed { .. }
        )
    }

    /// Check if retrying the operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeviceError::Timeout { .. } | DeviceError::Busy(_) | DeviceError::VendorSdk { .. }
        )
    }

    /// Create a not found error.
    pub fn not_found(device: impl Into<String>) -> Self {
        DeviceError::NotFound(device.into())
    }

    /// Create a disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        DeviceError::Disconnected(device.into())
    }

    /// Create an open failure.
    pub fn open_failed(device: impl Into<String>, reason: impl Into<String>) -> Self {
        DeviceError::OpenFailed {
            device: device.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(device: impl Into<String>, timeout_ms: u64) -> Self {
        DeviceError::Timeout {
            device: device.into(),
            timeout_ms,
        }
    }

    /// Create an unsupported device error.
    pub fn unsupported(vendor_id: u16, product_id: u16) -> Self {
        DeviceError::UnsupportedDevice {
            vendor_id,
            product_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_severity() {
        assert_eq!(
            DeviceError::disconnected("deck").severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(
            DeviceError::unsupported(0x1234, 0x5678).severity(),
            ErrorSeverity::Info
        );
    }

    #[test]
    fn test_device_unavailable() {
        assert!(DeviceError::open_failed("legion", "access denied").is_device_unavailable());
        assert!(!DeviceError::timeout("legion", 10).is_device_unavailable());
    }

    #[test]
    fn test_retryable() {
        assert!(DeviceError::timeout("deck", 5).is_retryable());
        assert!(!DeviceError::not_found("deck").is_retryable());
    }

    #[test]
    fn test_unsupported_display() {
        let err = DeviceError::unsupported(0x28DE, 0x1205);
        assert_eq!(
            err.to_string(),
            "Unsupported device: vendor=0x28de, product=0x1205"
        );
    }
}
