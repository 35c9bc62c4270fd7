//! Key chord output.

use tracing::trace;

use crate::output::{KeyCode, OutputEvent, OutputSink};
use crate::press::PressOutput;

/// Presses `keys` in order on the rising edge and releases them in reverse
/// order on the falling edge.
#[derive(Debug, Clone)]
pub struct KeyboardAction {
    pub keys: Vec<KeyCode>,
    held: bool,
}

impl KeyboardAction {
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self { keys, held: false }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn execute(&mut self, output: PressOutput, sink: &mut dyn OutputSink) {
        if output.rising() && !self.held {
            trace!("key chord down: {:?}", self.keys);
            for key in &self.keys {
                sink.emit(OutputEvent::KeyDown(*key));
            }
            self.held = true;
        } else if output.falling() && self.held {
            trace!("key chord up: {:?}", self.keys);
            for key in self.keys.iter().rev() {
                sink.emit(OutputEvent::KeyUp(*key));
            }
            self.held = false;
        }
    }

    /// Release a held chord, e.g. when the layout is swapped mid-press.
    pub fn release(&mut self, sink: &mut dyn OutputSink) {
        if self.held {
            for key in self.keys.iter().rev() {
                sink.emit(OutputEvent::KeyUp(*key));
            }
            self.held = false;
        }
    }
}
