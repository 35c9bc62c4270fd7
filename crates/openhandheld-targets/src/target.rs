//! Virtual target: one emulated pad on a [`VirtualBus`].

use std::collections::VecDeque;
use std::time::Duration;

use openhandheld_errors::TargetError;
use openhandheld_input::ControllerState;
use tracing::{debug, info, trace, warn};

use crate::bus::{Feedback, TargetKind, VirtualBus};
use crate::dualshock4::Ds4ReportBuilder;
use crate::touch::Ds4Touch;
use crate::xbox360::Xbox360Report;

/// Bus handle and connection state shared by every target kind.
pub struct TargetPort {
    bus: Box<dyn VirtualBus>,
    connected: bool,
    feedback: VecDeque<Feedback>,
}

impl std::fmt::Debug for TargetPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetPort")
            .field("connected", &self.connected)
            .field("pending_feedback", &self.feedback.len())
            .finish_non_exhaustive()
    }
}

impl TargetPort {
    fn new(bus: Box<dyn VirtualBus>) -> Self {
        Self {
            bus,
            connected: false,
            feedback: VecDeque::new(),
        }
    }

    fn submit(&mut self, kind: TargetKind, report: &[u8]) -> Result<(), TargetError> {
        if let Err(e) = self.bus.submit_report(report) {
            warn!("{} report dropped: {}", kind, e);
            if e == TargetError::InvalidTarget {
                self.connected = false;
            }
            return Err(e);
        }
        while let Some(feedback) = self.bus.poll_feedback() {
            self.feedback.push_back(feedback);
        }
        Ok(())
    }
}

/// An emulated gamepad, fixed to one kind at construction.
#[derive(Debug)]
pub enum VirtualTarget {
    Xbox360(TargetPort),
    DualShock4 {
        port: TargetPort,
        builder: Ds4ReportBuilder,
    },
}

impl VirtualTarget {
    /// `interval` is the tick period; the DS4 timestamp advances by it on
    /// every report.
    pub fn new(kind: TargetKind, bus: Box<dyn VirtualBus>, interval: Duration) -> Self {
        debug!(
            "Created virtual {} VID=0x{:04X} PID=0x{:04X}",
            kind,
            kind.vendor_id(),
            kind.product_id()
        );
        let port = TargetPort::new(bus);
        match kind {
            TargetKind::Xbox360 => Self::Xbox360(port),
            TargetKind::DualShock4 => Self::DualShock4 {
                port,
                builder: Ds4ReportBuilder::new(interval),
            },
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Xbox360(_) => TargetKind::Xbox360,
            Self::DualShock4 { .. } => TargetKind::DualShock4,
        }
    }

    fn port(&self) -> &TargetPort {
        match self {
            Self::Xbox360(port) | Self::DualShock4 { port, .. } => port,
        }
    }

    fn port_mut(&mut self) -> &mut TargetPort {
        match self {
            Self::Xbox360(port) | Self::DualShock4 { port, .. } => port,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.port().connected
    }

    /// Plug the target into the bus. Connecting twice is a no-op.
    pub fn connect(&mut self) -> Result<(), TargetError> {
        if self.is_connected() {
            return Ok(());
        }
        let kind = self.kind();
        let port = self.port_mut();
        if let Err(e) = port.bus.connect(kind) {
            warn!("Failed to connect {}: {}", kind, e);
            if let Err(e) = port.bus.disconnect() {
                debug!("Disconnect after failed connect: {}", e);
            }
            return Err(e);
        }
        port.connected = true;
        info!("{} connected", kind);
        Ok(())
    }

    pub fn disconnect(&mut self) -> Result<(), TargetError> {
        if !self.is_connected() {
            return Ok(());
        }
        let kind = self.kind();
        let port = self.port_mut();
        port.bus.disconnect()?;
        port.connected = false;
        info!("{} disconnected", kind);
        Ok(())
    }

    /// Build and submit the report for `state`.
    ///
    /// A disconnected target ignores the call. Bus failures are logged and
    /// returned; the report for this tick is lost.
    pub fn submit(&mut self, state: &ControllerState) -> Result<(), TargetError> {
        if !self.is_connected() {
            trace!("{} not connected, skipping tick {}", self.kind(), state.tick);
            return Ok(());
        }
        match self {
            Self::Xbox360(port) => {
                let report = Xbox360Report::from_state(state).to_bytes();
                port.submit(TargetKind::Xbox360, &report)
            }
            Self::DualShock4 { port, builder } => {
                let report = builder.build(state);
                port.submit(TargetKind::DualShock4, &report)
            }
        }
    }

    /// Rumble requests received since the last call, oldest first.
    pub fn take_feedback(&mut self) -> Vec<Feedback> {
        self.port_mut().feedback.drain(..).collect()
    }

    /// Touch tracker of a DualShock 4 target.
    pub fn touch_mut(&mut self) -> Option<&mut Ds4Touch> {
        match self {
            Self::Xbox360(_) => None,
            Self::DualShock4 { builder, .. } => Some(builder.touch_mut()),
        }
    }
}
