//! IPC-specific error types

use thiserror::Error;

/// IPC error type
#[derive(Debug, Error)]
pub enum IpcError {
    /// Fewer bytes than a frame header
    #[error("Frame header needs {need} bytes, got {got}")]
    HeaderTooShort {
        /// Bytes available
        got: usize,
        /// Header size
        need: usize,
    },

    /// Header carries a code no message uses
    #[error("Unknown pipe code {0}")]
    UnknownCode(u16),

    /// Declared payload length disagrees with the bytes present
    #[error("Payload length mismatch: header says {declared}, frame has {actual}")]
    LengthMismatch {
        /// Length from the header
        declared: usize,
        /// Bytes following the header
        actual: usize,
    },

    /// Payload above the codec limit
    #[error("Payload of {len} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Payload size
        len: usize,
        /// Codec limit
        max: usize,
    },

    /// JSON payload could not be encoded or decoded
    #[error("Payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    /// The peer went away
    #[error("Pipe disconnected")]
    Disconnected,

    /// Transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl IpcError {
    /// Check if this error is recoverable by retrying later
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IpcError::Disconnected | IpcError::Transport(_))
    }

    /// Check if this error means the received frame is malformed
    pub fn is_malformed_frame(&self) -> bool {
        matches!(
            self,
            IpcError::HeaderTooShort { .. }
                | IpcError::UnknownCode(_)
                | IpcError::LengthMismatch { .. }
                | IpcError::PayloadTooLarge { .. }
                | IpcError::Payload(_)
        )
    }
}

/// Specialized Result type for IPC operations
pub type IpcResult<T> = std::result::Result<T, IpcError>;
