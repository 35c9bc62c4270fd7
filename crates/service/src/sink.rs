//! Output sink for hosts without keyboard and mouse injection.

use openhandheld_actions::{OutputEvent, OutputSink};
use tracing::{debug, info};

/// Logs every event instead of injecting it. Companion commands are logged
/// at `info`, everything else at `debug`.
#[derive(Debug, Default)]
pub struct TracingSink {
    emitted: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl OutputSink for TracingSink {
    fn emit(&mut self, event: OutputEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            OutputEvent::Special(command) => info!("Companion command: {:?}", command),
            other => debug!("Output event: {:?}", other),
        }
    }
}
