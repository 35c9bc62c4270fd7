//! Transport abstraction for pipe frames
//!
//! A transport moves whole frames. The named-pipe or socket implementation
//! lives with the process that owns the pipe; [`ChannelTransport`] connects
//! two endpoints in one process.

use crossbeam::channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::error::{IpcError, IpcResult};

pub trait PipeTransport: Send {
    /// Send one encoded frame.
    fn send_frame(&mut self, frame: &[u8]) -> IpcResult<()>;

    /// Next received frame, without blocking.
    fn try_recv_frame(&mut self) -> IpcResult<Option<Vec<u8>>>;
}

impl<T: PipeTransport + ?Sized> PipeTransport for Box<T> {
    fn send_frame(&mut self, frame: &[u8]) -> IpcResult<()> {
        (**self).send_frame(frame)
    }

    fn try_recv_frame(&mut self) -> IpcResult<Option<Vec<u8>>> {
        (**self).try_recv_frame()
    }
}

/// One end of an in-process frame channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
}

impl ChannelTransport {
    /// Two connected endpoints.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = unbounded();
        let (b_tx, a_rx) = unbounded();
        (Self { tx: a_tx, rx: a_rx }, Self { tx: b_tx, rx: b_rx })
    }

    /// Frames sent by the peer and not yet received.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl PipeTransport for ChannelTransport {
    fn send_frame(&mut self, frame: &[u8]) -> IpcResult<()> {
        self.tx
            .send(frame.to_vec())
            .map_err(|e| IpcError::Transport(format!("peer dropped {} byte frame", e.0.len())))
    }

    fn try_recv_frame(&mut self) -> IpcResult<Option<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(IpcError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_cross_in_order() -> IpcResult<()> {
        let (mut a, mut b) = ChannelTransport::pair();
        a.send_frame(b"one")?;
        a.send_frame(b"two")?;
        assert_eq!(b.pending(), 2);
        assert_eq!(b.try_recv_frame()?, Some(b"one".to_vec()));
        assert_eq!(b.try_recv_frame()?, Some(b"two".to_vec()));
        assert_eq!(b.try_recv_frame()?, None);
        Ok(())
    }

    #[test]
    fn dropped_peer_is_reported() {
        let (mut a, b) = ChannelTransport::pair();
        drop(b);
        assert!(matches!(a.send_frame(b"x"), Err(IpcError::Transport(_))));
        assert!(matches!(a.try_recv_frame(), Err(IpcError::Disconnected)));
    }
}
