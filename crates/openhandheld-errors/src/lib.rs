//! Centralized error types for OpenHandheld
//!
//! Every failure the companion core can observe is transient: a device that
//! fails to open stays disconnected and is retried, a virtual bus that rejects
//! a report skips that tick. The types here let callers classify an error and
//! decide whether to log and continue.
//!
//! - [`common`]: the top-level [`CompanionError`], categories and severities
//! - [`device`]: physical controller errors
//! - [`target`]: virtual bus and virtual target errors
//! - [`config`]: configuration load and validation errors
//!
//! # Example
//!
//! ```
//! use openhandheld_errors::prelude::*;
//!
//! fn submit() -> Result<()> {
//!     Err(TargetError::BusNotFound.into())
//! }
//!
//! let err = submit().unwrap_err();
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), ErrorCategory::Target);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod common;
pub mod config;
pub mod device;
pub mod prelude;
pub mod target;

pub use common::{CompanionError, ErrorCategory, ErrorSeverity};
pub use config::ConfigError;
pub use device::DeviceError;
pub use target::TargetError;

/// A specialized `Result` type for OpenHandheld operations.
pub type Result<T> = std::result::Result<T, CompanionError>;
