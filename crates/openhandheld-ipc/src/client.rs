//! Outbound pipe endpoint with a disconnected-aware queue.
//!
//! The client counts as connected once the peer has sent `ServerPing`.
//! Until then, high-rate messages (see [`PipeCode::is_droppable`]) are
//! discarded and everything else waits in a FIFO queue that
//! [`PipeClient::flush`] replays after the next ping.
//!
//! [`PipeCode::is_droppable`]: crate::PipeCode::is_droppable

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use crate::codec::{FrameHeader, MessageCodec, frame_flags};
use crate::error::{IpcError, IpcResult};
use crate::message::PipeMessage;
use crate::transport::PipeTransport;

#[derive(Debug)]
pub struct PipeClient<T> {
    transport: T,
    codec: MessageCodec,
    connected: bool,
    queue: VecDeque<PipeMessage>,
    sequence: u32,
}

impl<T: PipeTransport> PipeClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_codec(transport, MessageCodec::new())
    }

    pub fn with_codec(transport: T, codec: MessageCodec) -> Self {
        Self {
            transport,
            codec,
            connected: false,
            queue: VecDeque::new(),
            sequence: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Messages waiting for a connection.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send now if connected, otherwise queue or drop.
    ///
    /// While connected, anything still queued is sent first.
    pub fn send(&mut self, message: PipeMessage) -> IpcResult<()> {
        if !self.connected {
            self.enqueue(message);
            return Ok(());
        }

        if !self.queue.is_empty() {
            self.queue.push_back(message);
            return self.flush().map(|_| ());
        }

        let frame = match self.encode(&message, 0) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping unencodable {:?}: {}", message.code(), e);
                return Err(e);
            }
        };
        if let Err(e) = self.transport.send_frame(&frame) {
            self.lost_connection(&e);
            self.enqueue(message);
            return Err(e);
        }
        Ok(())
    }

    /// Replay queued messages in order. Returns how many were sent.
    ///
    /// Does nothing while disconnected. A failed write keeps that message
    /// and all later ones queued; a message that cannot be encoded is
    /// dropped.
    pub fn flush(&mut self) -> IpcResult<usize> {
        if !self.connected {
            return Ok(0);
        }

        let mut sent = 0;
        while let Some(message) = self.queue.front() {
            let frame = match self.codec.encode(message, self.sequence, frame_flags::REPLAYED) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Dropping unencodable queued {:?}: {}", message.code(), e);
                    self.queue.pop_front();
                    continue;
                }
            };
            self.sequence = self.sequence.wrapping_add(1);
            if let Err(e) = self.transport.send_frame(&frame) {
                self.lost_connection(&e);
                return Err(e);
            }
            self.queue.pop_front();
            sent += 1;
        }

        if sent > 0 {
            debug!("Replayed {} queued pipe messages", sent);
        }
        Ok(sent)
    }

    /// Drain received frames, tracking the connection from `ServerPing`.
    ///
    /// Malformed frames are logged and skipped.
    pub fn poll(&mut self) -> IpcResult<Vec<PipeMessage>> {
        let mut received = Vec::new();
        loop {
            let frame = match self.transport.try_recv_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    self.lost_connection(&e);
                    return Err(e);
                }
            };

            match self.codec.decode(&frame) {
                Ok((header, message)) => {
                    trace!("Received {:?} seq={}", message.code(), header.sequence);
                    self.on_message(&message);
                    received.push(message);
                }
                Err(e) => warn!("Dropping malformed pipe frame: {}", e),
            }
        }
        Ok(received)
    }

    /// Update the connection state from an inbound message.
    pub fn on_message(&mut self, message: &PipeMessage) {
        if matches!(message, PipeMessage::ServerPing) && !self.connected {
            self.connected = true;
            info!("Pipe connected, {} messages queued", self.queue.len());
        }
    }

    /// Mark the peer as gone; later sends queue again.
    pub fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            info!("Pipe disconnected");
        }
    }

    fn enqueue(&mut self, message: PipeMessage) {
        if message.is_droppable() {
            trace!("Dropping {:?} while disconnected", message.code());
            return;
        }
        self.queue.push_back(message);
    }

    fn encode(&mut self, message: &PipeMessage, flags: u16) -> IpcResult<Vec<u8>> {
        let frame = self.codec.encode(message, self.sequence, flags)?;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame)
    }

    fn lost_connection(&mut self, error: &IpcError) {
        if error.is_recoverable() {
            warn!("Pipe write failed: {}", error);
            self.disconnect();
        }
    }
}

/// Sequence number of an encoded frame, for diagnostics.
pub fn frame_sequence(frame: &[u8]) -> Option<u32> {
    FrameHeader::decode(frame).ok().map(|h| h.sequence)
}
