//! Virtual gamepad bus seam.
//!
//! The concrete bus driver (ViGEm on Windows, uinput elsewhere) lives behind
//! [`VirtualBus`]; this crate only builds the bytes it submits.

use openhandheld_errors::TargetError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ids::{DS4_PRODUCT_ID, DS4_VENDOR_ID, XBOX360_PRODUCT_ID, XBOX360_VENDOR_ID};

/// Which pad the bus emulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    #[serde(rename = "xbox360", alias = "xbox")]
    Xbox360,
    #[serde(rename = "dualshock4", alias = "ds4")]
    DualShock4,
}

impl TargetKind {
    pub const fn vendor_id(self) -> u16 {
        match self {
            Self::Xbox360 => XBOX360_VENDOR_ID,
            Self::DualShock4 => DS4_VENDOR_ID,
        }
    }

    pub const fn product_id(self) -> u16 {
        match self {
            Self::Xbox360 => XBOX360_PRODUCT_ID,
            Self::DualShock4 => DS4_PRODUCT_ID,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Xbox360 => "Xbox 360 Controller",
            Self::DualShock4 => "DualShock 4 Controller",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rumble request raised by the game through the bus driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub large_motor: u8,
    pub small_motor: u8,
}

pub trait VirtualBus: Send {
    /// Plug a target of `kind` into the bus.
    fn connect(&mut self, kind: TargetKind) -> Result<(), TargetError>;

    fn disconnect(&mut self) -> Result<(), TargetError>;

    /// Submit one raw report for the connected target.
    fn submit_report(&mut self, report: &[u8]) -> Result<(), TargetError>;

    /// Next pending rumble request, if any.
    fn poll_feedback(&mut self) -> Option<Feedback>;
}

/// Bus that accepts every call and discards the reports, for running the
/// tick loop without a bus driver installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus {
    reports: u64,
}

impl NullBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> u64 {
        self.reports
    }
}

impl VirtualBus for NullBus {
    fn connect(&mut self, kind: TargetKind) -> Result<(), TargetError> {
        debug!("Null bus plugged {}", kind);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TargetError> {
        Ok(())
    }

    fn submit_report(&mut self, _report: &[u8]) -> Result<(), TargetError> {
        self.reports = self.reports.wrapping_add(1);
        Ok(())
    }

    fn poll_feedback(&mut self) -> Option<Feedback> {
        None
    }
}

pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct MockBusState {
        connected: Option<TargetKind>,
        submitted: Vec<Vec<u8>>,
        feedback: VecDeque<Feedback>,
        failure: Option<TargetError>,
        connects: usize,
    }

    /// In-memory bus. Clones share state, so a test can keep a handle after
    /// boxing one into a target.
    #[derive(Debug, Clone, Default)]
    pub struct MockBus {
        state: Arc<Mutex<MockBusState>>,
    }

    impl MockBus {
        pub fn new() -> Self {
            Self::default()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, MockBusState> {
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }

        pub fn submitted(&self) -> Vec<Vec<u8>> {
            self.lock().submitted.clone()
        }

        pub fn last_report(&self) -> Option<Vec<u8>> {
            self.lock().submitted.last().cloned()
        }

        pub fn connected(&self) -> Option<TargetKind> {
            self.lock().connected
        }

        pub fn connect_count(&self) -> usize {
            self.lock().connects
        }

        /// Queue a rumble request as if raised by a game.
        pub fn raise_feedback(&self, large_motor: u8, small_motor: u8) {
            self.lock().feedback.push_back(Feedback {
                large_motor,
                small_motor,
            });
        }

        /// Fail every call with `error` until [`MockBus::heal`].
        pub fn fail_with(&self, error: TargetError) {
            self.lock().failure = Some(error);
        }

        pub fn heal(&self) {
            self.lock().failure = None;
        }
    }

    impl VirtualBus for MockBus {
        fn connect(&mut self, kind: TargetKind) -> Result<(), TargetError> {
            let mut state = self.lock();
            if let Some(error) = state.failure.clone() {
                return Err(error);
            }
            state.connected = Some(kind);
            state.connects += 1;
            Ok(())
        }

        fn disconnect(&mut self) -> Result<(), TargetError> {
            self.lock().connected = None;
            Ok(())
        }

        fn submit_report(&mut self, report: &[u8]) -> Result<(), TargetError> {
            let mut state = self.lock();
            if let Some(error) = state.failure.clone() {
                return Err(error);
            }
            if state.connected.is_none() {
                return Err(TargetError::InvalidTarget);
            }
            state.submitted.push(report.to_vec());
            Ok(())
        }

        fn poll_feedback(&mut self) -> Option<Feedback> {
            self.lock().feedback.pop_front()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serde_names() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&TargetKind::DualShock4)?, "\"dualshock4\"");
        let kind: TargetKind = serde_json::from_str("\"ds4\"")?;
        assert_eq!(kind, TargetKind::DualShock4);
        Ok(())
    }

    #[test]
    fn null_bus_counts_and_never_rumbles() -> Result<(), TargetError> {
        let mut bus = NullBus::new();
        bus.connect(TargetKind::Xbox360)?;
        bus.submit_report(&[0; 12])?;
        bus.submit_report(&[0; 12])?;
        assert_eq!(bus.reports(), 2);
        assert_eq!(bus.poll_feedback(), None);
        Ok(())
    }

    #[test]
    fn kinds_carry_usb_identity() {
        assert_eq!(TargetKind::Xbox360.vendor_id(), 0x045E);
        assert_eq!(TargetKind::DualShock4.product_id(), 0x09CC);
    }
}
