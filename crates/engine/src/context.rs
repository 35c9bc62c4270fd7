//! Application context: everything one tick touches.
//!
//! [`AppContext`] owns the registered adapters, the layout mapper, the
//! virtual target, the output sink and the optional pipe client. One call
//! to [`AppContext::tick`] runs the whole pipeline on the calling thread:
//!
//! 1. drain inbound pipe messages;
//! 2. tick every adapter in registration order;
//! 3. pick the active controller (the first connected adapter);
//! 4. map its snapshot through the layout;
//! 5. submit the result to the target;
//! 6. route rumble from the target back to the controller and the pipe.

use std::sync::Arc;

use openhandheld_actions::{HapticStrength, OutputEvent, OutputSink};
use openhandheld_hid_common::{HidDeviceInfo, HidPort};
use openhandheld_input::ControllerState;
use openhandheld_ipc::{
    ControllerConnect, Cursor, CursorAction, CursorButton, PipeClient, PipeMessage, PipeTransport,
    Vibration,
};
use openhandheld_targets::{TouchFinger, VirtualTarget};
use tracing::{debug, info, trace, warn};

use crate::adapter::{
    AdapterKind, AdapterOptions, ControllerAdapter, NoXInput, XInputAdapter, XInputSource,
    adapter_for_device, create_adapter,
};
use crate::error::EngineResult;
use crate::layout::LayoutMapper;

/// How often a disconnected target is plugged in again.
pub const TARGET_RETRY_MS: f32 = 1000.0;

struct AdapterSlot {
    /// HID path, `None` for XInput slots.
    path: Option<String>,
    adapter: Box<dyn ControllerAdapter>,
}

/// Sink for one tick: haptic events are kept for the active controller,
/// everything else goes to the OS sink.
struct TickSink<'a> {
    inner: &'a mut dyn OutputSink,
    haptics: &'a mut Vec<HapticStrength>,
}

impl OutputSink for TickSink<'_> {
    fn emit(&mut self, event: OutputEvent) {
        match event {
            OutputEvent::Haptic(strength) => self.haptics.push(strength),
            other => self.inner.emit(other),
        }
    }
}

pub struct AppContext {
    adapters: Vec<AdapterSlot>,
    active: Option<usize>,
    mapper: LayoutMapper,
    target: VirtualTarget,
    sink: Box<dyn OutputSink + Send>,
    pipe: Option<PipeClient<Box<dyn PipeTransport>>>,
    xinput: Arc<dyn XInputSource>,
    options: AdapterOptions,
    haptics: Vec<HapticStrength>,
    retry_ms: f32,
    last_output: ControllerState,
    shutdown_requested: bool,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("adapters", &self.adapters.len())
            .field("active", &self.active)
            .field("target", &self.target)
            .field("pipe", &self.pipe.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(target: VirtualTarget, mapper: LayoutMapper, sink: Box<dyn OutputSink + Send>) -> Self {
        Self {
            adapters: Vec::new(),
            active: None,
            mapper,
            target,
            sink,
            pipe: None,
            xinput: Arc::new(NoXInput),
            options: AdapterOptions::default(),
            haptics: Vec::new(),
            retry_ms: 0.0,
            last_output: ControllerState::default(),
            shutdown_requested: false,
        }
    }

    pub fn with_pipe(mut self, transport: Box<dyn PipeTransport>) -> Self {
        self.pipe = Some(PipeClient::new(transport));
        self
    }

    pub fn with_xinput(mut self, source: Arc<dyn XInputSource>) -> Self {
        self.xinput = source;
        self
    }

    pub fn with_options(mut self, options: AdapterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub fn target(&self) -> &VirtualTarget {
        &self.target
    }

    pub fn mapper(&self) -> &LayoutMapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut LayoutMapper {
        &mut self.mapper
    }

    pub fn pipe(&self) -> Option<&PipeClient<Box<dyn PipeTransport>>> {
        self.pipe.as_ref()
    }

    /// State submitted on the last tick that had an active controller.
    pub fn last_output(&self) -> &ControllerState {
        &self.last_output
    }

    /// Set once the peer sent `ForceShutdown`.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub fn adapters(&self) -> impl Iterator<Item = &dyn ControllerAdapter> + '_ {
        self.adapters.iter().map(|slot| slot.adapter.as_ref())
    }

    pub fn active_adapter(&self) -> Option<&dyn ControllerAdapter> {
        let slot = self.adapters.get(self.active?)?;
        Some(slot.adapter.as_ref())
    }

    /// Register an adapter that is already attached, or will be driven by
    /// the caller. Returns its index.
    pub fn add_adapter(&mut self, adapter: Box<dyn ControllerAdapter>) -> usize {
        info!("Registered {} adapter '{}'", adapter.kind(), adapter.name());
        self.adapters.push(AdapterSlot { path: None, adapter });
        self.adapters.len() - 1
    }

    /// Attach a HID device, reusing the adapter previously registered for
    /// the same path.
    ///
    /// Returns `Ok(None)` for devices no adapter handles. A device that
    /// fails to open stays registered, disconnected, so a later arrival can
    /// retry it.
    ///
    /// # Errors
    ///
    /// Returns the device error from [`ControllerAdapter::attach`].
    pub fn attach_device(&mut self, port: &dyn HidPort, info: &HidDeviceInfo) -> EngineResult<Option<AdapterKind>> {
        let Some(kind) = adapter_for_device(info) else {
            trace!(
                "No adapter for VID=0x{:04X} PID=0x{:04X}",
                info.vendor_id, info.product_id
            );
            return Ok(None);
        };

        let index = match self.slot_for_path(&info.path) {
            Some(index) => index,
            None => {
                debug!(
                    "Creating {} adapter for VID=0x{:04X} PID=0x{:04X}",
                    kind, info.vendor_id, info.product_id
                );
                let adapter = create_adapter(kind, &self.options, Arc::clone(&self.xinput));
                self.adapters.push(AdapterSlot {
                    path: Some(info.path.clone()),
                    adapter,
                });
                self.adapters.len() - 1
            }
        };

        if let Some(slot) = self.adapters.get_mut(index) {
            if let Err(e) = slot.adapter.attach(port, info) {
                warn!("Failed to attach {} at {}: {}", kind, info.path, e);
                return Err(e.into());
            }
        }
        Ok(Some(kind))
    }

    /// Detach the device at `path`. The adapter stays registered.
    pub fn detach_device(&mut self, path: &str) -> bool {
        let Some(index) = self.slot_for_path(path) else {
            return false;
        };
        if let Some(slot) = self.adapters.get_mut(index) {
            info!("Detaching {} at {}", slot.adapter.kind(), path);
            slot.adapter.detach();
        }
        true
    }

    /// Register an XInput pad on `user`, or on the first connected slot.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::NotFound`](openhandheld_errors::DeviceError::NotFound)
    /// when no matching slot has a pad.
    pub fn attach_xinput(&mut self, user: Option<u8>) -> EngineResult<u8> {
        let mut adapter = XInputAdapter::new(Arc::clone(&self.xinput), &self.options);
        let user = adapter.attach_user(user)?;
        self.add_adapter(Box::new(adapter));
        Ok(user)
    }

    /// Plug the virtual target in. A failure is logged and retried from
    /// [`tick`](Self::tick).
    pub fn start(&mut self) {
        if let Err(e) = self.target.connect() {
            warn!("Virtual {} unavailable, will retry: {}", self.target.kind(), e);
        }
    }

    /// Run one tick of the pipeline.
    pub fn tick(&mut self, ticks: u64, delta_ms: f32) {
        self.poll_pipe();

        for slot in &mut self.adapters {
            slot.adapter.tick(ticks, delta_ms, true);
        }
        self.update_active(ticks);
        self.retry_target(delta_ms);

        let Some(index) = self.active else {
            self.flush_pipe();
            return;
        };
        let Some(slot) = self.adapters.get_mut(index) else {
            return;
        };

        let input = slot.adapter.state();
        let mut sink = TickSink {
            inner: &mut *self.sink,
            haptics: &mut self.haptics,
        };
        let output = self.mapper.apply(&input, delta_ms, &mut sink);
        for strength in self.haptics.drain(..) {
            slot.adapter.pulse(strength);
        }

        if let Err(e) = self.target.submit(&output) {
            debug!("Tick {} not submitted: {}", ticks, e);
        }

        for feedback in self.target.take_feedback() {
            slot.adapter.set_vibration(feedback.large_motor, feedback.small_motor);
            let vibration = Vibration {
                large_motor: feedback.large_motor,
                small_motor: feedback.small_motor,
            };
            Self::send_on(&mut self.pipe, PipeMessage::ServerVibration(vibration));
        }

        self.last_output = output;
        self.flush_pipe();
    }

    /// Release held outputs, unplug every adapter and the target.
    pub fn shutdown(&mut self) {
        info!("Shutting down {} adapters", self.adapters.len());
        self.mapper.reset(&mut *self.sink);
        for slot in &mut self.adapters {
            if slot.adapter.is_plugged() {
                slot.adapter.unplug();
            }
            slot.adapter.detach();
        }
        if self.active.take().is_some() {
            Self::send_on(&mut self.pipe, PipeMessage::ClientControllerDisconnect);
        }
        if let Err(e) = self.target.disconnect() {
            warn!("Failed to unplug virtual {}: {}", self.target.kind(), e);
        }
        self.flush_pipe();
    }

    fn slot_for_path(&self, path: &str) -> Option<usize> {
        self.adapters
            .iter()
            .position(|slot| slot.path.as_deref() == Some(path))
    }

    fn update_active(&mut self, ticks: u64) {
        let next = self.adapters.iter().position(|slot| slot.adapter.is_connected());
        if next == self.active {
            return;
        }

        if let Some(slot) = self.active.and_then(|index| self.adapters.get_mut(index)) {
            info!("Controller '{}' unplugged", slot.adapter.name());
            if slot.adapter.is_plugged() {
                slot.adapter.unplug();
            }
            self.mapper.reset(&mut *self.sink);
            Self::send_on(&mut self.pipe, PipeMessage::ClientControllerDisconnect);

            if next.is_none() {
                // Nothing will drive the pad until a controller returns.
                let neutral = ControllerState::new(ticks);
                if let Err(e) = self.target.submit(&neutral) {
                    debug!("Neutral report for tick {} not submitted: {}", ticks, e);
                }
                self.last_output = neutral;
            }
        }

        self.active = next;
        if let Some(slot) = next.and_then(|index| self.adapters.get_mut(index)) {
            slot.adapter.plug();
            info!("Controller '{}' plugged", slot.adapter.name());
            let connect = ControllerConnect {
                name: slot.adapter.name().to_string(),
                capabilities: slot.adapter.capabilities(),
            };
            Self::send_on(&mut self.pipe, PipeMessage::ClientControllerConnect(connect));
        }
    }

    fn retry_target(&mut self, delta_ms: f32) {
        if self.target.is_connected() {
            self.retry_ms = 0.0;
            return;
        }
        self.retry_ms += delta_ms;
        if self.retry_ms >= TARGET_RETRY_MS {
            self.retry_ms = 0.0;
            if let Err(e) = self.target.connect() {
                debug!("Virtual {} still unavailable: {}", self.target.kind(), e);
            }
        }
    }

    fn poll_pipe(&mut self) {
        let Some(pipe) = &mut self.pipe else {
            return;
        };
        let messages = match pipe.poll() {
            Ok(messages) => messages,
            Err(e) => {
                debug!("Pipe poll failed: {}", e);
                return;
            }
        };
        for message in messages {
            self.handle_message(message);
        }
    }

    fn handle_message(&mut self, message: PipeMessage) {
        match message {
            PipeMessage::ClientCursor(cursor) => self.handle_cursor(cursor),
            PipeMessage::ForceShutdown => {
                info!("Shutdown requested over the pipe");
                self.shutdown_requested = true;
            }
            other => trace!("Ignoring pipe message {:?}", other.code()),
        }
    }

    fn handle_cursor(&mut self, cursor: Cursor) {
        let finger = match cursor.button {
            CursorButton::TouchLeft => TouchFinger::Left,
            CursorButton::TouchRight => TouchFinger::Right,
            CursorButton::None => return,
        };
        let Some(touch) = self.target.touch_mut() else {
            trace!("Cursor ignored, target has no touchpad");
            return;
        };
        match cursor.action {
            CursorAction::Down => touch.cursor_down(finger, cursor.x, cursor.y, cursor.is_double_tap()),
            CursorAction::Move => touch.cursor_move(finger, cursor.x, cursor.y),
            CursorAction::Up => touch.cursor_up(finger, cursor.x, cursor.y),
        }
    }

    fn send_on(pipe: &mut Option<PipeClient<Box<dyn PipeTransport>>>, message: PipeMessage) {
        if let Some(pipe) = pipe {
            if let Err(e) = pipe.send(message) {
                debug!("Pipe send failed: {}", e);
            }
        }
    }

    fn flush_pipe(&mut self) {
        if let Some(pipe) = &mut self.pipe {
            if let Err(e) = pipe.flush() {
                debug!("Pipe flush failed: {}", e);
            }
        }
    }
}
