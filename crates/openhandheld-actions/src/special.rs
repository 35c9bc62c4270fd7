//! Companion commands.

use tracing::debug;

use crate::output::{OutputEvent, OutputSink, SpecialCommand};
use crate::press::PressOutput;

#[derive(Debug, Clone)]
pub struct SpecialAction {
    pub command: SpecialCommand,
}

impl SpecialAction {
    /// Fire the command once per rising edge.
    pub fn execute(&self, output: PressOutput, sink: &mut dyn OutputSink) {
        if output.rising() {
            debug!("special command {:?}", self.command);
            sink.emit(OutputEvent::Special(self.command));
        }
    }
}
