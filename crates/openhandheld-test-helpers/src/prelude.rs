//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use openhandheld_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_parse, must_some, must_with};
pub use crate::poll::{WAIT_TIMEOUT, wait_until};

#[cfg(feature = "mock")]
pub use crate::mock::{BusCall, RecordingBus, RecordingSink};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{DualSenseReport, LegionReport, NeptuneReport};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
