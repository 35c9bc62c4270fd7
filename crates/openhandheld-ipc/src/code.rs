//! Pipe message codes.
//!
//! The code is the first field of every frame header and selects how the
//! JSON payload is decoded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum PipeCode {
    ServerPing = 0,
    ClientProfile = 1,
    ServerToast = 2,
    ClientCursor = 3,
    ClientInputs = 4,
    ClientMovements = 5,
    ServerSettings = 6,
    ClientControllerConnect = 7,
    ClientSettings = 8,
    ClientControllerDisconnect = 10,
    ServerVibration = 11,
    ForceShutdown = 13,
    ServerSensor = 14,
    ClientNavigated = 15,
    ClientOverlay = 16,
}

impl PipeCode {
    pub const ALL: [PipeCode; 15] = [
        PipeCode::ServerPing,
        PipeCode::ClientProfile,
        PipeCode::ServerToast,
        PipeCode::ClientCursor,
        PipeCode::ClientInputs,
        PipeCode::ClientMovements,
        PipeCode::ServerSettings,
        PipeCode::ClientControllerConnect,
        PipeCode::ClientSettings,
        PipeCode::ClientControllerDisconnect,
        PipeCode::ServerVibration,
        PipeCode::ForceShutdown,
        PipeCode::ServerSensor,
        PipeCode::ClientNavigated,
        PipeCode::ClientOverlay,
    ];

    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_u16() == value)
    }

    /// High-rate messages that are stale by the time a peer reconnects.
    pub const fn is_droppable(self) -> bool {
        matches!(
            self,
            PipeCode::ClientCursor
                | PipeCode::ClientInputs
                | PipeCode::ClientMovements
                | PipeCode::ServerSensor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_fixed_values() {
        assert_eq!(PipeCode::ServerPing.as_u16(), 0);
        assert_eq!(PipeCode::ClientControllerDisconnect.as_u16(), 10);
        assert_eq!(PipeCode::ServerVibration.as_u16(), 11);
        assert_eq!(PipeCode::ClientOverlay.as_u16(), 16);
    }

    #[test]
    fn gaps_are_unknown() {
        for value in [9u16, 12, 17, u16::MAX] {
            assert_eq!(PipeCode::from_u16(value), None, "{value}");
        }
        for code in PipeCode::ALL {
            assert_eq!(PipeCode::from_u16(code.as_u16()), Some(code));
        }
    }
}
