//! Property tests for error classification.

use openhandheld_errors::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// No device error is ever classified as fatal.
    #[test]
    fn prop_device_errors_are_recoverable(vid in any::<u16>(), pid in any::<u16>(), ms in any::<u64>(), name in "[a-z]{1,12}") {
        let errors = [
            DeviceError::unsupported(vid, pid),
            DeviceError::timeout(name.clone(), ms),
            DeviceError::not_found(name.clone()),
            DeviceError::disconnected(name.clone()),
            DeviceError::open_failed(name, "denied"),
        ];
        for err in errors {
            let err: CompanionError = err.into();
            prop_assert!(err.is_recoverable());
        }
    }

    /// In-range values always pass validation.
    #[test]
    fn prop_check_range_accepts_inside(value in 0.0f64..=1.0) {
        prop_assert!(ConfigError::check_range("v", value, 0.0, 1.0).is_ok());
    }
}
