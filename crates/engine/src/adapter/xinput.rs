//! XInput pads.
//!
//! XInput controllers are polled per user slot rather than read over HID.
//! The OS call lives behind [`XInputSource`] so that the adapter logic runs
//! anywhere; the service plugs in the platform source and tests use
//! [`MemoryXInput`].
//!
//! The Legion Go adapter reuses [`XInputAdapter`] for its sticks, triggers
//! and face buttons.

use std::sync::Arc;

use handheld_hid_xinput_protocol::{
    LEFT_THUMB_DEADZONE, MAX_USERS, RIGHT_THUMB_DEADZONE, XInputButtons, XInputGamepad,
    XInputState, XInputVibration, stick_directions,
};
use openhandheld_errors::DeviceError;
use openhandheld_hid_common::{HidDeviceInfo, HidPort};
use openhandheld_input::{
    AxisFlags, AxisLayoutSet, ButtonFlags, ButtonState, ControllerState, SharedControllerState,
};
use openhandheld_ipc::ControllerCapabilities;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{
    AdapterCore, AdapterKind, AdapterOptions, AdapterStatus, ControllerAdapter, FULL_PULL,
    SOFT_PULL,
};

/// Access to the XInput user slots.
pub trait XInputSource: Send + Sync {
    /// State of `user`, or `None` when nothing is connected there.
    fn get_state(&self, user: u8) -> Option<XInputState>;

    /// Returns `false` when the slot did not accept the request.
    fn set_vibration(&self, user: u8, vibration: XInputVibration) -> bool;
}

/// Source with every slot empty, for platforms without XInput.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoXInput;

impl XInputSource for NoXInput {
    fn get_state(&self, _user: u8) -> Option<XInputState> {
        None
    }

    fn set_vibration(&self, _user: u8, _vibration: XInputVibration) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct MemorySlots {
    states: [Option<XInputState>; MAX_USERS as usize],
    vibrations: Vec<(u8, XInputVibration)>,
}

/// In-memory slots. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryXInput {
    slots: Arc<Mutex<MemorySlots>>,
}

impl MemoryXInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug a pad into `user`, or update the one there.
    pub fn set_state(&self, user: u8, state: XInputState) {
        if let Some(slot) = self.slots.lock().states.get_mut(usize::from(user)) {
            *slot = Some(state);
        }
    }

    pub fn unplug(&self, user: u8) {
        if let Some(slot) = self.slots.lock().states.get_mut(usize::from(user)) {
            *slot = None;
        }
    }

    /// Every vibration request so far, oldest first.
    pub fn vibrations(&self) -> Vec<(u8, XInputVibration)> {
        self.slots.lock().vibrations.clone()
    }
}

impl XInputSource for MemoryXInput {
    fn get_state(&self, user: u8) -> Option<XInputState> {
        self.slots.lock().states.get(usize::from(user)).copied().flatten()
    }

    fn set_vibration(&self, user: u8, vibration: XInputVibration) -> bool {
        let mut slots = self.slots.lock();
        let present = slots.states.get(usize::from(user)).is_some_and(Option::is_some);
        if present {
            slots.vibrations.push((user, vibration));
        }
        present
    }
}

const BUTTON_MAP: [(XInputButtons, ButtonFlags); 15] = [
    (XInputButtons::A, ButtonFlags::B1),
    (XInputButtons::B, ButtonFlags::B2),
    (XInputButtons::X, ButtonFlags::B3),
    (XInputButtons::Y, ButtonFlags::B4),
    (XInputButtons::START, ButtonFlags::Start),
    (XInputButtons::BACK, ButtonFlags::Back),
    (XInputButtons::GUIDE, ButtonFlags::Special),
    (XInputButtons::LEFT_SHOULDER, ButtonFlags::L1),
    (XInputButtons::RIGHT_SHOULDER, ButtonFlags::R1),
    (XInputButtons::LEFT_THUMB, ButtonFlags::LeftStickClick),
    (XInputButtons::RIGHT_THUMB, ButtonFlags::RightStickClick),
    (XInputButtons::DPAD_UP, ButtonFlags::DPadUp),
    (XInputButtons::DPAD_DOWN, ButtonFlags::DPadDown),
    (XInputButtons::DPAD_LEFT, ButtonFlags::DPadLeft),
    (XInputButtons::DPAD_RIGHT, ButtonFlags::DPadRight),
];

/// Write one gamepad sample into `state`.
pub fn map_gamepad(pad: &XInputGamepad, state: &mut ControllerState) {
    let buttons = &mut state.buttons;
    for (bit, flag) in BUTTON_MAP {
        buttons.set(flag, pad.is_pressed(bit));
    }

    buttons.set(ButtonFlags::L2Soft, pad.left_trigger > SOFT_PULL);
    buttons.set(ButtonFlags::R2Soft, pad.right_trigger > SOFT_PULL);
    buttons.set(ButtonFlags::L2Full, pad.left_trigger > FULL_PULL);
    buttons.set(ButtonFlags::R2Full, pad.right_trigger > FULL_PULL);

    let (left, right, down, up) = stick_directions(pad.thumb_lx, pad.thumb_ly, LEFT_THUMB_DEADZONE);
    buttons.set(ButtonFlags::LeftStickLeft, left);
    buttons.set(ButtonFlags::LeftStickRight, right);
    buttons.set(ButtonFlags::LeftStickDown, down);
    buttons.set(ButtonFlags::LeftStickUp, up);

    let (left, right, down, up) = stick_directions(pad.thumb_rx, pad.thumb_ry, RIGHT_THUMB_DEADZONE);
    buttons.set(ButtonFlags::RightStickLeft, left);
    buttons.set(ButtonFlags::RightStickRight, right);
    buttons.set(ButtonFlags::RightStickDown, down);
    buttons.set(ButtonFlags::RightStickUp, up);

    let axes = &mut state.axes;
    axes.set(AxisFlags::LeftStickX, pad.thumb_lx);
    axes.set(AxisFlags::LeftStickY, pad.thumb_ly);
    axes.set(AxisFlags::RightStickX, pad.thumb_rx);
    axes.set(AxisFlags::RightStickY, pad.thumb_ry);
    axes.set(AxisFlags::L2, i16::from(pad.left_trigger));
    axes.set(AxisFlags::R2, i16::from(pad.right_trigger));
}

/// Adapter over one XInput user slot.
pub struct XInputAdapter {
    core: AdapterCore,
    source: Arc<dyn XInputSource>,
    user: Option<u8>,
    strength: f64,
}

impl std::fmt::Debug for XInputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XInputAdapter")
            .field("user", &self.user)
            .field("status", &self.core.status())
            .finish_non_exhaustive()
    }
}

impl XInputAdapter {
    pub fn new(source: Arc<dyn XInputSource>, options: &AdapterOptions) -> Self {
        Self {
            core: AdapterCore::new(AdapterKind::XInput.name()),
            source,
            user: None,
            strength: options.vibration_strength,
        }
    }

    /// The bound user slot.
    pub fn user(&self) -> Option<u8> {
        self.user
    }

    /// Bind to `requested`, or to the first connected slot.
    pub(crate) fn attach_user(&mut self, requested: Option<u8>) -> Result<u8, DeviceError> {
        self.core.status_cell().store(AdapterStatus::Busy);
        let found = match requested {
            Some(user) => self.source.get_state(user).map(|_| user),
            None => (0..MAX_USERS).find(|user| self.source.get_state(*user).is_some()),
        };

        match found {
            Some(user) => {
                self.user = Some(user);
                self.core.status_cell().store(AdapterStatus::Connected);
                info!("Attached XInput user {}", user);
                Ok(user)
            }
            None => {
                self.user = None;
                self.core.status_cell().store(AdapterStatus::Disconnected);
                let slot = requested.map_or_else(|| "any".to_string(), |u| u.to_string());
                warn!("No XInput controller in slot {}", slot);
                Err(DeviceError::NotFound(format!("xinput user {slot}")))
            }
        }
    }

    /// The state built by the last tick, committed or not.
    pub(crate) fn working(&self) -> &ControllerState {
        self.core.working()
    }
}

impl ControllerAdapter for XInputAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::XInput
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn status(&self) -> AdapterStatus {
        self.core.status()
    }

    fn attach(&mut self, _port: &dyn HidPort, info: &HidDeviceInfo) -> Result<(), DeviceError> {
        let requested = u8::try_from(info.interface_number)
            .ok()
            .filter(|user| *user < MAX_USERS);
        self.attach_user(requested)?;
        if self.core.is_plugged() {
            self.plug();
        }
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(user) = self.user.take() {
            debug!("Detached XInput user {}", user);
        }
        self.core.status_cell().store(AdapterStatus::Disconnected);
        self.core.reset();
    }

    fn plug(&mut self) {
        self.core.set_plugged(true);
    }

    fn unplug(&mut self) {
        self.core.set_plugged(false);
        self.set_vibration(0, 0);
    }

    fn is_plugged(&self) -> bool {
        self.core.is_plugged()
    }

    fn tick(&mut self, ticks: u64, _delta_ms: f32, commit: bool) {
        if self.core.status() != AdapterStatus::Connected {
            return;
        }
        let Some(user) = self.user else {
            return;
        };
        let Some(state) = self.source.get_state(user) else {
            warn!("XInput user {} disconnected", user);
            self.core.status_cell().store(AdapterStatus::Disconnected);
            return;
        };

        map_gamepad(&state.gamepad, self.core.begin(ticks));
        if commit {
            self.core.commit();
        }
    }

    fn state(&self) -> SharedControllerState {
        self.core.state()
    }

    fn source_buttons(&self) -> ButtonState {
        ButtonFlags::common()
    }

    fn source_axes(&self) -> AxisLayoutSet {
        AxisLayoutSet::COMMON
    }

    fn capabilities(&self) -> ControllerCapabilities {
        ControllerCapabilities::RUMBLE
    }

    fn set_vibration(&mut self, large_motor: u8, small_motor: u8) {
        let Some(user) = self.user else {
            return;
        };
        let vibration = XInputVibration::from_motors(large_motor, small_motor, self.strength);
        if !self.source.set_vibration(user, vibration) {
            debug!("XInput user {} rejected vibration", user);
        }
    }

    fn inject_button(&mut self, flag: ButtonFlags, pressed: bool) {
        self.core.inject(flag, pressed);
    }
}
