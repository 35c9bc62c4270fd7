//! Pipe messages for OpenHandheld
//!
//! The companion talks to its desktop side over a local pipe. This crate
//! owns what crosses it, not how the pipe is opened:
//!
//! - [`code`]: stable numeric message codes
//! - [`message`]: the [`PipeMessage`] tagged union and its bodies
//! - [`codec`]: 12-byte frame header plus JSON payload
//! - [`transport`]: frame transport trait and an in-process channel
//! - [`client`]: outbound endpoint that queues while disconnected
//!
//! # Example
//!
//! ```
//! use openhandheld_ipc::prelude::*;
//!
//! let (local, _remote) = ChannelTransport::pair();
//! let mut client = PipeClient::new(local);
//!
//! client.send(PipeMessage::ServerSensor(Sensor::default()))?;
//! client.send(PipeMessage::ServerVibration(Vibration::default()))?;
//! assert_eq!(client.queue_len(), 1);
//!
//! client.on_message(&PipeMessage::ServerPing);
//! assert_eq!(client.flush()?, 1);
//! # Ok::<(), IpcError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod code;
pub mod codec;
pub mod error;
pub mod message;
pub mod prelude;
pub mod transport;

pub use client::PipeClient;
pub use code::PipeCode;
pub use codec::{FrameHeader, MessageCodec};
pub use error::{IpcError, IpcResult};
pub use message::{
    ControllerCapabilities, ControllerConnect, Cursor, CursorAction, CursorButton, PipeMessage, Sensor, SensorType,
    Toast, Vibration,
};
pub use transport::{ChannelTransport, PipeTransport};
