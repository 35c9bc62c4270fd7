//! Prelude for the IPC crate.

pub use crate::client::PipeClient;
pub use crate::code::PipeCode;
pub use crate::codec::MessageCodec;
pub use crate::error::{IpcError, IpcResult};
pub use crate::message::{Cursor, CursorAction, CursorButton, PipeMessage, Sensor, Vibration};
pub use crate::transport::{ChannelTransport, PipeTransport};
