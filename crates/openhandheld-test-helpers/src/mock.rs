//! Recording doubles for the output sink and the virtual bus.
//!
//! Both are cheap handles over shared state: clone one, hand the clone to
//! the code under test, and inspect the original afterwards.

use std::collections::VecDeque;
use std::sync::Arc;

use openhandheld_actions::{KeyCode, OutputEvent, OutputSink};
use openhandheld_errors::TargetError;
use openhandheld_targets::{Feedback, TargetKind, VirtualBus};
use parking_lot::Mutex;

/// Output sink that records every event.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<OutputEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn key_downs(&self) -> Vec<KeyCode> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                OutputEvent::KeyDown(key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    pub fn key_ups(&self) -> Vec<KeyCode> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                OutputEvent::KeyUp(key) => Some(*key),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl OutputSink for RecordingSink {
    fn emit(&mut self, event: OutputEvent) {
        self.events.lock().push(event);
    }
}

/// One call observed by a [`RecordingBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusCall {
    Connect(TargetKind),
    Disconnect,
    Submit(Vec<u8>),
}

#[derive(Debug, Default)]
struct BusState {
    calls: Vec<BusCall>,
    plugged: Option<TargetKind>,
    feedback: VecDeque<Feedback>,
    failure: Option<TargetError>,
}

/// Virtual bus that logs every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingBus {
    state: Arc<Mutex<BusState>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BusCall> {
        self.state.lock().calls.clone()
    }

    /// Submitted report bytes, oldest first.
    pub fn reports(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BusCall::Submit(report) => Some(report.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_report(&self) -> Option<Vec<u8>> {
        self.reports().pop()
    }

    pub fn plugged(&self) -> Option<TargetKind> {
        self.state.lock().plugged
    }

    /// Queue a rumble request as if the game raised it.
    pub fn raise_feedback(&self, large_motor: u8, small_motor: u8) {
        self.state.lock().feedback.push_back(Feedback {
            large_motor,
            small_motor,
        });
    }

    /// Fail connect and submit with `error` until [`RecordingBus::heal`].
    pub fn fail_with(&self, error: TargetError) {
        self.state.lock().failure = Some(error);
    }

    pub fn heal(&self) {
        self.state.lock().failure = None;
    }
}

impl VirtualBus for RecordingBus {
    fn connect(&mut self, kind: TargetKind) -> Result<(), TargetError> {
        let mut state = self.state.lock();
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        state.plugged = Some(kind);
        state.calls.push(BusCall::Connect(kind));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TargetError> {
        let mut state = self.state.lock();
        state.plugged = None;
        state.calls.push(BusCall::Disconnect);
        Ok(())
    }

    fn submit_report(&mut self, report: &[u8]) -> Result<(), TargetError> {
        let mut state = self.state.lock();
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        if state.plugged.is_none() {
            return Err(TargetError::InvalidTarget);
        }
        state.calls.push(BusCall::Submit(report.to_vec()));
        Ok(())
    }

    fn poll_feedback(&mut self) -> Option<Feedback> {
        self.state.lock().feedback.pop_front()
    }
}
