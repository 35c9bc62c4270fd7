//! Pipe message tagged union.
//!
//! Each variant owns the body that is serialized as the JSON payload of its
//! frame. The variant is recovered from the frame code, never from the
//! payload.

use std::collections::BTreeMap;

use bitflags::bitflags;
use openhandheld_input::{ControllerState, GyroState};
use serde::{Deserialize, Serialize};

use crate::code::PipeCode;
use crate::error::IpcResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toast {
    pub title: String,
    pub content: String,
    pub image: String,
}

impl Default for Toast {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            image: "Toast".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorAction {
    #[default]
    Up,
    Down,
    Move,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorButton {
    #[default]
    None,
    TouchLeft,
    TouchRight,
}

/// Flags value above which a cursor-down counts as a double tap.
pub const CURSOR_DOUBLE_TAP_FLAGS: i32 = 26;

/// Overlay cursor event, coordinates normalized to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cursor {
    pub action: CursorAction,
    pub x: f64,
    pub y: f64,
    pub button: CursorButton,
    pub flags: i32,
}

impl Cursor {
    pub fn is_double_tap(&self) -> bool {
        self.flags > CURSOR_DOUBLE_TAP_FLAGS
    }
}

bitflags! {
    /// Sensors a connected controller reports.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ControllerCapabilities: u16 {
        const GYROSCOPE = 1;
        const ACCELEROMETER = 2;
        const TRACKPADS = 4;
        const RUMBLE = 8;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConnect {
    pub name: String,
    pub capabilities: ControllerCapabilities,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vibration {
    pub large_motor: u8,
    pub small_motor: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    #[default]
    Gyrometer,
    Accelerometer,
    Inclinometer,
    Quaternion,
}

/// Raw sensor reading forwarded to the desktop side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensor {
    pub sensor_type: SensorType,
    pub reading: [f32; 3],
    pub quaternion: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Empty {}

/// Every message that crosses the pipe.
#[derive(Debug, Clone, PartialEq)]
pub enum PipeMessage {
    ServerPing,
    /// Opaque profile document; the core only forwards it.
    ClientProfile(serde_json::Value),
    ServerToast(Toast),
    ClientCursor(Cursor),
    ClientInputs(ControllerState),
    ClientMovements(GyroState),
    ServerSettings(BTreeMap<String, String>),
    ClientControllerConnect(ControllerConnect),
    ClientSettings(BTreeMap<String, serde_json::Value>),
    ClientControllerDisconnect,
    ServerVibration(Vibration),
    ForceShutdown,
    ServerSensor(Sensor),
    ClientNavigated(String),
    ClientOverlay(i32),
}

impl PipeMessage {
    pub fn code(&self) -> PipeCode {
        match self {
            PipeMessage::ServerPing => PipeCode::ServerPing,
            PipeMessage::ClientProfile(_) => PipeCode::ClientProfile,
            PipeMessage::ServerToast(_) => PipeCode::ServerToast,
            PipeMessage::ClientCursor(_) => PipeCode::ClientCursor,
            PipeMessage::ClientInputs(_) => PipeCode::ClientInputs,
            PipeMessage::ClientMovements(_) => PipeCode::ClientMovements,
            PipeMessage::ServerSettings(_) => PipeCode::ServerSettings,
            PipeMessage::ClientControllerConnect(_) => PipeCode::ClientControllerConnect,
            PipeMessage::ClientSettings(_) => PipeCode::ClientSettings,
            PipeMessage::ClientControllerDisconnect => PipeCode::ClientControllerDisconnect,
            PipeMessage::ServerVibration(_) => PipeCode::ServerVibration,
            PipeMessage::ForceShutdown => PipeCode::ForceShutdown,
            PipeMessage::ServerSensor(_) => PipeCode::ServerSensor,
            PipeMessage::ClientNavigated(_) => PipeCode::ClientNavigated,
            PipeMessage::ClientOverlay(_) => PipeCode::ClientOverlay,
        }
    }

    /// Serialize the body of this message.
    pub fn payload(&self) -> IpcResult<Vec<u8>> {
        let bytes = match self {
            PipeMessage::ServerPing
            | PipeMessage::ClientControllerDisconnect
            | PipeMessage::ForceShutdown => serde_json::to_vec(&Empty {})?,
            PipeMessage::ClientProfile(profile) => serde_json::to_vec(profile)?,
            PipeMessage::ServerToast(toast) => serde_json::to_vec(toast)?,
            PipeMessage::ClientCursor(cursor) => serde_json::to_vec(cursor)?,
            PipeMessage::ClientInputs(state) => serde_json::to_vec(state)?,
            PipeMessage::ClientMovements(gyro) => serde_json::to_vec(gyro)?,
            PipeMessage::ServerSettings(settings) => serde_json::to_vec(settings)?,
            PipeMessage::ClientControllerConnect(connect) => serde_json::to_vec(connect)?,
            PipeMessage::ClientSettings(settings) => serde_json::to_vec(settings)?,
            PipeMessage::ServerVibration(vibration) => serde_json::to_vec(vibration)?,
            PipeMessage::ServerSensor(sensor) => serde_json::to_vec(sensor)?,
            PipeMessage::ClientNavigated(tag) => serde_json::to_vec(tag)?,
            PipeMessage::ClientOverlay(visibility) => serde_json::to_vec(visibility)?,
        };
        Ok(bytes)
    }

    /// Rebuild a message from its code and payload.
    pub fn from_payload(code: PipeCode, payload: &[u8]) -> IpcResult<Self> {
        let message = match code {
            PipeCode::ServerPing => PipeMessage::ServerPing,
            PipeCode::ClientControllerDisconnect => PipeMessage::ClientControllerDisconnect,
            PipeCode::ForceShutdown => PipeMessage::ForceShutdown,
            PipeCode::ClientProfile => PipeMessage::ClientProfile(serde_json::from_slice(payload)?),
            PipeCode::ServerToast => PipeMessage::ServerToast(serde_json::from_slice(payload)?),
            PipeCode::ClientCursor => PipeMessage::ClientCursor(serde_json::from_slice(payload)?),
            PipeCode::ClientInputs => PipeMessage::ClientInputs(serde_json::from_slice(payload)?),
            PipeCode::ClientMovements => PipeMessage::ClientMovements(serde_json::from_slice(payload)?),
            PipeCode::ServerSettings => PipeMessage::ServerSettings(serde_json::from_slice(payload)?),
            PipeCode::ClientControllerConnect => {
                PipeMessage::ClientControllerConnect(serde_json::from_slice(payload)?)
            }
            PipeCode::ClientSettings => PipeMessage::ClientSettings(serde_json::from_slice(payload)?),
            PipeCode::ServerVibration => PipeMessage::ServerVibration(serde_json::from_slice(payload)?),
            PipeCode::ServerSensor => PipeMessage::ServerSensor(serde_json::from_slice(payload)?),
            PipeCode::ClientNavigated => PipeMessage::ClientNavigated(serde_json::from_slice(payload)?),
            PipeCode::ClientOverlay => PipeMessage::ClientOverlay(serde_json::from_slice(payload)?),
        };
        Ok(message)
    }

    /// See [`PipeCode::is_droppable`].
    pub fn is_droppable(&self) -> bool {
        self.code().is_droppable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_messages_carry_empty_object() -> IpcResult<()> {
        assert_eq!(PipeMessage::ServerPing.payload()?, b"{}");
        assert_eq!(PipeMessage::from_payload(PipeCode::ForceShutdown, b"{}")?, PipeMessage::ForceShutdown);
        Ok(())
    }

    #[test]
    fn sparse_toast_gets_default_image() -> IpcResult<()> {
        let message = PipeMessage::from_payload(PipeCode::ServerToast, br#"{"title":"Profile applied"}"#)?;
        let PipeMessage::ServerToast(toast) = message else {
            return Err(crate::IpcError::UnknownCode(u16::MAX));
        };
        assert_eq!(toast.title, "Profile applied");
        assert_eq!(toast.image, "Toast");
        Ok(())
    }

    #[test]
    fn cursor_double_tap_threshold() {
        let tap = Cursor {
            flags: 20,
            ..Cursor::default()
        };
        let double = Cursor { flags: 27, ..tap };
        assert!(!tap.is_double_tap());
        assert!(double.is_double_tap());
    }

    #[test]
    fn droppable_messages() {
        assert!(PipeMessage::ServerSensor(Sensor::default()).is_droppable());
        assert!(PipeMessage::ClientInputs(ControllerState::default()).is_droppable());
        assert!(!PipeMessage::ServerPing.is_droppable());
        assert!(!PipeMessage::ServerVibration(Vibration::default()).is_droppable());
    }

    #[test]
    fn wrong_payload_shape_is_an_error() {
        let result = PipeMessage::from_payload(PipeCode::ClientOverlay, br#"{"visibility":1}"#);
        assert!(matches!(result, Err(crate::IpcError::Payload(_))));
    }
}
