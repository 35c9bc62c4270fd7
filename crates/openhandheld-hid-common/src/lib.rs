//! Common HID utilities for handheld controller adapters
//!
//! This crate provides the device traits, device descriptors and report
//! readers shared by the protocol crates and the engine's adapters. The real
//! `hidapi` backend is behind the `hidapi` feature so protocol crates and
//! tests stay free of native dependencies.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
#[cfg(feature = "hidapi")]
pub mod hidapi_backend;
pub mod hid_traits;
pub mod report_parser;

pub use device_info::*;
pub use hid_traits::*;
pub use report_parser::*;

use thiserror::Error;

/// Failure of a HID transport call. Adapters fold these into
/// `DeviceError` before they leave the engine.
#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("No HID device at {0}")]
    DeviceNotFound(String),

    #[error("Cannot open HID device: {0}")]
    OpenError(String),

    #[error("HID read failed: {0}")]
    ReadError(String),

    #[error("HID write failed: {0}")]
    WriteError(String),

    #[error("Malformed report: {0}")]
    InvalidReport(String),

    #[error("HID device is not open")]
    Disconnected,
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
