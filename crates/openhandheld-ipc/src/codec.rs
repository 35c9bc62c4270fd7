//! Frame encoding and decoding
//!
//! ## Frame layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | Pipe code (u16 LE) |
//! | 2 | 4 | Payload length (u32 LE) |
//! | 6 | 4 | Sequence number (u32 LE) |
//! | 10 | 2 | Flags (u16 LE) |
//! | 12 | n | JSON payload |

use crate::code::PipeCode;
use crate::error::{IpcError, IpcResult};
use crate::message::PipeMessage;

/// Default payload limit.
pub const DEFAULT_MAX_PAYLOAD: usize = 1024 * 1024;

/// Wire frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Pipe code of the payload
    pub code: u16,
    /// Payload length
    pub payload_len: u32,
    /// Sequence number
    pub sequence: u32,
    /// Flags
    pub flags: u16,
}

impl FrameHeader {
    /// Header size in bytes
    pub const SIZE: usize = 12;

    pub fn new(code: PipeCode, payload_len: u32, sequence: u32) -> Self {
        Self {
            code: code.as_u16(),
            payload_len,
            sequence,
            flags: 0,
        }
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let [c0, c1] = self.code.to_le_bytes();
        let [l0, l1, l2, l3] = self.payload_len.to_le_bytes();
        let [s0, s1, s2, s3] = self.sequence.to_le_bytes();
        let [f0, f1] = self.flags.to_le_bytes();
        [c0, c1, l0, l1, l2, l3, s0, s1, s2, s3, f0, f1]
    }

    pub fn decode(bytes: &[u8]) -> IpcResult<Self> {
        let Some(&[c0, c1, l0, l1, l2, l3, s0, s1, s2, s3, f0, f1]) = bytes.first_chunk::<{ Self::SIZE }>()
        else {
            return Err(IpcError::HeaderTooShort {
                got: bytes.len(),
                need: Self::SIZE,
            });
        };

        Ok(Self {
            code: u16::from_le_bytes([c0, c1]),
            payload_len: u32::from_le_bytes([l0, l1, l2, l3]),
            sequence: u32::from_le_bytes([s0, s1, s2, s3]),
            flags: u16::from_le_bytes([f0, f1]),
        })
    }

    pub fn set_flag(&mut self, flag: u16) {
        self.flags |= flag;
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        (self.flags & flag) != 0
    }
}

/// Frame flags
pub mod frame_flags {
    /// Sent again from the outbound queue after a reconnect
    pub const REPLAYED: u16 = 0x0001;
}

/// Frame codec with a payload limit
#[derive(Debug, Clone, Copy)]
pub struct MessageCodec {
    max_payload: usize,
}

impl MessageCodec {
    pub fn new() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    pub fn with_max_payload(max_payload: usize) -> Self {
        Self { max_payload }
    }

    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    /// Encode `message` into one frame.
    pub fn encode(&self, message: &PipeMessage, sequence: u32, flags: u16) -> IpcResult<Vec<u8>> {
        let payload = message.payload()?;
        let payload_len = self.check_len(payload.len())?;

        let mut header = FrameHeader::new(message.code(), payload_len, sequence);
        header.set_flag(flags);

        let mut frame = Vec::with_capacity(FrameHeader::SIZE + payload.len());
        frame.extend_from_slice(&header.encode());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode exactly one frame.
    pub fn decode(&self, frame: &[u8]) -> IpcResult<(FrameHeader, PipeMessage)> {
        let header = FrameHeader::decode(frame)?;
        let code = PipeCode::from_u16(header.code).ok_or(IpcError::UnknownCode(header.code))?;

        let declared = usize::try_from(header.payload_len).unwrap_or(usize::MAX);
        if declared > self.max_payload {
            return Err(IpcError::PayloadTooLarge {
                len: declared,
                max: self.max_payload,
            });
        }

        let payload = frame.get(FrameHeader::SIZE..).unwrap_or_default();
        if payload.len() != declared {
            return Err(IpcError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        let message = PipeMessage::from_payload(code, payload)?;
        Ok((header, message))
    }

    fn check_len(&self, len: usize) -> IpcResult<u32> {
        if len > self.max_payload {
            return Err(IpcError::PayloadTooLarge {
                len,
                max: self.max_payload,
            });
        }
        u32::try_from(len).ok().ok_or(IpcError::PayloadTooLarge {
            len,
            max: self.max_payload,
        })
    }
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self::new()
    }
}
