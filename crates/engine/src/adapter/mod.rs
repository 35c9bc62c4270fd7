//! Physical controller adapters.
//!
//! One adapter per device family turns that family's raw reports into the
//! canonical [`ControllerState`]. Every adapter follows the same contract:
//!
//! - [`ControllerAdapter::attach`] binds to a device descriptor. It is
//!   idempotent: an open device is closed first, the new one is opened and
//!   the previous plug state is restored.
//! - [`ControllerAdapter::tick`] does nothing unless the adapter is
//!   [`AdapterStatus::Connected`]. Otherwise it decodes the latest report
//!   and, when `commit` is set, publishes a fresh state.
//! - Open failures are logged and leave the adapter disconnected but
//!   reusable.
//!
//! [`adapter_for`] routes a VID/PID pair to the adapter kind that drives it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use handheld_hid_dualsense_protocol as dualsense;
use handheld_hid_legion_protocol as legion;
use handheld_hid_neptune_protocol as neptune;
use openhandheld_actions::HapticStrength;
use openhandheld_errors::DeviceError;
use openhandheld_hid_common::{HidDeviceInfo, HidPort};
use openhandheld_input::{
    AxisLayoutSet, ButtonFlags, ButtonState, ControllerState, SharedControllerState,
};
use openhandheld_ipc::ControllerCapabilities;
use serde::{Deserialize, Serialize};

pub mod dualsense_pad;
pub mod legion_go;
pub mod reader;
pub mod scale;
pub mod steam_deck;
pub mod xinput;

#[cfg(test)]
mod dualsense_tests;
#[cfg(test)]
mod legion_tests;

pub use dualsense_pad::DualSenseAdapter;
pub use legion_go::{LegionAdapter, TapGesture, TouchGestures};
pub use reader::{HidLink, ReportReader, ReportSlot};
pub use scale::{AxisMap, RawAxis, SensorOverrides, SensorScale};
pub use steam_deck::NeptuneAdapter;
pub use xinput::{MemoryXInput, NoXInput, XInputAdapter, XInputSource, map_gamepad};

/// Trigger byte past which the soft-pull button is held.
pub const SOFT_PULL: u8 = 30;

/// Trigger byte past which the full-pull button is held.
pub const FULL_PULL: u8 = 240;

/// Lifecycle state of an adapter.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AdapterStatus {
    #[default]
    Disconnected = 0,
    Connected = 1,
    /// Attach in progress.
    Busy = 2,
    /// Close in progress.
    Disposing = 3,
}

impl AdapterStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connected,
            2 => Self::Busy,
            3 => Self::Disposing,
            _ => Self::Disconnected,
        }
    }
}

/// Status shared between an adapter and its read thread.
#[derive(Debug, Clone, Default)]
pub struct StatusCell(Arc<AtomicU8>);

impl StatusCell {
    pub fn new(status: AdapterStatus) -> Self {
        Self(Arc::new(AtomicU8::new(status as u8)))
    }

    pub fn load(&self) -> AdapterStatus {
        AdapterStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, status: AdapterStatus) {
        self.0.store(status as u8, Ordering::Release);
    }
}

/// Device families with an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    XInput,
    Neptune,
    Legion,
    DualSense,
}

impl AdapterKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::XInput => "XInput Controller",
            Self::Neptune => "Steam Deck Controller",
            Self::Legion => "Legion Go Controller",
            Self::DualSense => "DualSense Controller",
        }
    }
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Adapter kind for a known HID device, by VID first and PID second.
///
/// XInput pads are not enumerated over HID and never match.
pub fn adapter_for(vendor_id: u16, product_id: u16) -> Option<AdapterKind> {
    match vendor_id {
        neptune::VALVE_VENDOR_ID if neptune::is_neptune(vendor_id, product_id) => {
            Some(AdapterKind::Neptune)
        }
        legion::LENOVO_VENDOR_ID if legion::is_legion_go(vendor_id, product_id) => {
            Some(AdapterKind::Legion)
        }
        dualsense::SONY_VENDOR_ID if dualsense::is_dualsense(vendor_id, product_id) => {
            Some(AdapterKind::DualSense)
        }
        _ => None,
    }
}

/// [`adapter_for`], also rejecting the interfaces of a composite device that
/// do not carry the controller reports. Unknown interface numbers and usage
/// pages are accepted.
pub fn adapter_for_device(info: &HidDeviceInfo) -> Option<AdapterKind> {
    let kind = adapter_for(info.vendor_id, info.product_id)?;
    let wanted = match kind {
        AdapterKind::Neptune => info.interface_number < 0 || info.interface_number == neptune::NEPTUNE_INTERFACE,
        AdapterKind::Legion => info.usage_page == 0 || info.usage_page == legion::ids::VENDOR_USAGE_PAGE,
        AdapterKind::XInput | AdapterKind::DualSense => true,
    };
    wanted.then_some(kind)
}

/// Which Legion joycon feeds the gyro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GyroSource {
    Left,
    #[default]
    Right,
}

impl From<GyroSource> for legion::ImuSide {
    fn from(source: GyroSource) -> Self {
        match source {
            GyroSource::Left => legion::ImuSide::Left,
            GyroSource::Right => legion::ImuSide::Right,
        }
    }
}

/// Settings shared by every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// Upper bound of one blocking HID read.
    pub read_timeout_ms: u32,
    /// Rumble gain, `0.0..=1.0`.
    pub vibration_strength: f64,
    pub legion_gyro_source: GyroSource,
    pub sensors: SensorOverrides,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            read_timeout_ms: 20,
            vibration_strength: 1.0,
            legion_gyro_source: GyroSource::default(),
            sensors: SensorOverrides::default(),
        }
    }
}

/// What every controller adapter exposes to the engine.
pub trait ControllerAdapter: Send {
    fn kind(&self) -> AdapterKind;

    fn name(&self) -> &str;

    fn status(&self) -> AdapterStatus;

    fn is_connected(&self) -> bool {
        self.status() == AdapterStatus::Connected
    }

    /// Bind to `info`, reopening if already bound.
    ///
    /// # Errors
    ///
    /// Returns the open failure. The adapter is left disconnected.
    fn attach(&mut self, port: &dyn HidPort, info: &HidDeviceInfo) -> Result<(), DeviceError>;

    /// Release the device after it disappeared. The adapter stays valid for
    /// a later [`ControllerAdapter::attach`].
    fn detach(&mut self);

    /// Take the device over as an input source.
    fn plug(&mut self);

    /// Hand the device back to its default behavior.
    fn unplug(&mut self);

    fn is_plugged(&self) -> bool;

    /// Decode the latest report. `delta_ms` is the time since the last tick.
    fn tick(&mut self, ticks: u64, delta_ms: f32, commit: bool);

    /// The last committed state.
    fn state(&self) -> SharedControllerState;

    fn source_buttons(&self) -> ButtonState;

    fn source_axes(&self) -> AxisLayoutSet;

    fn capabilities(&self) -> ControllerCapabilities;

    /// Forward a rumble request; motor bytes are `0..=255`.
    fn set_vibration(&mut self, large_motor: u8, small_motor: u8);

    /// Hold or release a button on top of the physical ones.
    fn inject_button(&mut self, flag: ButtonFlags, pressed: bool);

    /// One short haptic pulse, for binding feedback. Devices without pad
    /// haptics ignore it.
    fn pulse(&mut self, _strength: HapticStrength) {}
}

/// Build the adapter for `kind`. `xinput` backs the XInput and Legion pads.
pub fn create_adapter(
    kind: AdapterKind,
    options: &AdapterOptions,
    xinput: Arc<dyn XInputSource>,
) -> Box<dyn ControllerAdapter> {
    match kind {
        AdapterKind::XInput => Box::new(XInputAdapter::new(xinput, options)),
        AdapterKind::Neptune => Box::new(NeptuneAdapter::new(options)),
        AdapterKind::Legion => Box::new(LegionAdapter::new(xinput, options)),
        AdapterKind::DualSense => Box::new(DualSenseAdapter::new(options)),
    }
}

/// State bookkeeping common to all adapters.
///
/// The working state is rebuilt every tick and frozen into a new `Arc` on
/// commit, so readers of [`AdapterCore::state`] never see a partial update.
#[derive(Debug)]
pub struct AdapterCore {
    name: String,
    status: StatusCell,
    plugged: bool,
    working: ControllerState,
    published: SharedControllerState,
    injected: ButtonState,
}

impl AdapterCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StatusCell::default(),
            plugged: false,
            working: ControllerState::default(),
            published: Arc::new(ControllerState::default()),
            injected: ButtonState::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn status_cell(&self) -> &StatusCell {
        &self.status
    }

    pub fn status(&self) -> AdapterStatus {
        self.status.load()
    }

    pub fn is_plugged(&self) -> bool {
        self.plugged
    }

    pub fn set_plugged(&mut self, plugged: bool) {
        self.plugged = plugged;
    }

    /// Start a new working state for `tick`.
    pub fn begin(&mut self, tick: u64) -> &mut ControllerState {
        self.working = ControllerState::new(tick);
        &mut self.working
    }

    pub fn working(&self) -> &ControllerState {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut ControllerState {
        &mut self.working
    }

    /// Merge injected buttons and publish the working state.
    pub fn commit(&mut self) {
        self.working.buttons.merge(&self.injected);
        self.published = self.working.publish(self.working.tick);
    }

    pub fn state(&self) -> SharedControllerState {
        Arc::clone(&self.published)
    }

    pub fn inject(&mut self, flag: ButtonFlags, pressed: bool) {
        self.injected.set(flag, pressed);
    }

    /// Publish a neutral state, keeping the tick id.
    pub fn reset(&mut self) {
        let tick = self.published.tick;
        self.working = ControllerState::new(tick);
        self.injected.clear();
        self.published = self.working.publish(tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_devices() {
        assert_eq!(adapter_for(0x28DE, 0x1205), Some(AdapterKind::Neptune));
        assert_eq!(adapter_for(0x17EF, 0x6182), Some(AdapterKind::Legion));
        assert_eq!(adapter_for(0x054C, 0x0CE6), Some(AdapterKind::DualSense));
        assert_eq!(adapter_for(0x054C, 0x05C4), None);
        assert_eq!(adapter_for(0x28DE, 0x1102), None);
        assert_eq!(adapter_for(0x045E, 0x028E), None);
    }

    #[test]
    fn composite_interfaces_are_filtered() {
        let deck = HidDeviceInfo::new(0x28DE, 0x1205, "/dev/hidraw0");
        assert_eq!(adapter_for_device(&deck.clone().with_interface(2)), Some(AdapterKind::Neptune));
        assert_eq!(adapter_for_device(&deck.clone().with_interface(0)), None);
        assert_eq!(adapter_for_device(&deck), Some(AdapterKind::Neptune));

        let legion = HidDeviceInfo::new(0x17EF, 0x6184, "/dev/hidraw1");
        assert_eq!(adapter_for_device(&legion.clone().with_usage_page(0x0001)), None);
        assert_eq!(
            adapter_for_device(&legion.with_usage_page(0xFFA0)),
            Some(AdapterKind::Legion)
        );
    }

    #[test]
    fn status_cell_is_shared() {
        let cell = StatusCell::default();
        let other = cell.clone();
        assert_eq!(cell.load(), AdapterStatus::Disconnected);
        other.store(AdapterStatus::Busy);
        assert_eq!(cell.load(), AdapterStatus::Busy);
    }

    #[test]
    fn core_publishes_fresh_snapshots() {
        let mut core = AdapterCore::new("test");
        let before = core.state();
        core.begin(7).buttons.press(ButtonFlags::B2);
        core.inject(ButtonFlags::Start, true);
        assert!(core.state().buttons.is_empty());
        core.commit();

        let after = core.state();
        assert_eq!(after.tick, 7);
        assert!(after.buttons.is_pressed(ButtonFlags::B2));
        assert!(after.buttons.is_pressed(ButtonFlags::Start));
        assert!(before.buttons.is_empty());
    }
}
