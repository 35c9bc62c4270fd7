//! Logical axes, axis layouts and the per-tick axis snapshot.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Lower bound of a stick or pad axis.
pub const AXIS_MIN: i16 = i16::MIN;
/// Upper bound of a stick or pad axis.
pub const AXIS_MAX: i16 = i16::MAX;
/// Upper bound of a trigger axis; triggers are stored as `0..=255` inside an `i16`.
pub const TRIGGER_MAX: i16 = 255;

/// A single logical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum AxisFlags {
    LeftStickX = 0,
    LeftStickY = 1,
    RightStickX = 2,
    RightStickY = 3,
    LeftPadX = 4,
    LeftPadY = 5,
    RightPadX = 6,
    RightPadY = 7,
    L2 = 8,
    R2 = 9,
    GyroX = 10,
    GyroY = 11,
}

impl AxisFlags {
    /// Number of logical axes.
    pub const COUNT: usize = 12;

    pub const ALL: [AxisFlags; Self::COUNT] = [
        Self::LeftStickX,
        Self::LeftStickY,
        Self::RightStickX,
        Self::RightStickY,
        Self::LeftPadX,
        Self::LeftPadY,
        Self::RightPadX,
        Self::RightPadY,
        Self::L2,
        Self::R2,
        Self::GyroX,
        Self::GyroY,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Triggers live in `0..=255`; everything else is a full signed axis.
    pub const fn is_trigger(self) -> bool {
        matches!(self, Self::L2 | Self::R2)
    }

    /// Value this axis rests at.
    pub const fn center(self) -> i16 {
        0
    }
}

/// A group of axes that is bound and shaped as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisLayoutFlags {
    LeftStick,
    RightStick,
    LeftPad,
    RightPad,
    L2,
    R2,
    Gyroscope,
}

impl AxisLayoutFlags {
    pub const ALL: [AxisLayoutFlags; 7] = [
        Self::LeftStick,
        Self::RightStick,
        Self::LeftPad,
        Self::RightPad,
        Self::L2,
        Self::R2,
        Self::Gyroscope,
    ];

    /// The horizontal (or only) axis of this layout.
    pub const fn x_axis(self) -> AxisFlags {
        match self {
            Self::LeftStick => AxisFlags::LeftStickX,
            Self::RightStick => AxisFlags::RightStickX,
            Self::LeftPad => AxisFlags::LeftPadX,
            Self::RightPad => AxisFlags::RightPadX,
            Self::L2 => AxisFlags::L2,
            Self::R2 => AxisFlags::R2,
            Self::Gyroscope => AxisFlags::GyroX,
        }
    }

    /// The vertical axis of this layout, `None` for single-axis triggers.
    pub const fn y_axis(self) -> Option<AxisFlags> {
        match self {
            Self::LeftStick => Some(AxisFlags::LeftStickY),
            Self::RightStick => Some(AxisFlags::RightStickY),
            Self::LeftPad => Some(AxisFlags::LeftPadY),
            Self::RightPad => Some(AxisFlags::RightPadY),
            Self::Gyroscope => Some(AxisFlags::GyroY),
            Self::L2 | Self::R2 => None,
        }
    }

    pub const fn is_trigger(self) -> bool {
        matches!(self, Self::L2 | Self::R2)
    }

    pub const fn is_pad(self) -> bool {
        matches!(self, Self::LeftPad | Self::RightPad)
    }

    const fn set_bit(self) -> AxisLayoutSet {
        match self {
            Self::LeftStick => AxisLayoutSet::LEFT_STICK,
            Self::RightStick => AxisLayoutSet::RIGHT_STICK,
            Self::LeftPad => AxisLayoutSet::LEFT_PAD,
            Self::RightPad => AxisLayoutSet::RIGHT_PAD,
            Self::L2 => AxisLayoutSet::L2,
            Self::R2 => AxisLayoutSet::R2,
            Self::Gyroscope => AxisLayoutSet::GYROSCOPE,
        }
    }
}

bitflags! {
    /// Capability set of [`AxisLayoutFlags`] an adapter exposes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AxisLayoutSet: u8 {
        const LEFT_STICK = 1 << 0;
        const RIGHT_STICK = 1 << 1;
        const LEFT_PAD = 1 << 2;
        const RIGHT_PAD = 1 << 3;
        const L2 = 1 << 4;
        const R2 = 1 << 5;
        const GYROSCOPE = 1 << 6;
    }
}

impl AxisLayoutSet {
    /// Sticks and triggers, which every gamepad has.
    pub const COMMON: AxisLayoutSet = AxisLayoutSet::LEFT_STICK
        .union(AxisLayoutSet::RIGHT_STICK)
        .union(AxisLayoutSet::L2)
        .union(AxisLayoutSet::R2);

    pub fn has(&self, layout: AxisLayoutFlags) -> bool {
        self.contains(layout.set_bit())
    }

    pub fn add(&mut self, layout: AxisLayoutFlags) {
        self.insert(layout.set_bit());
    }

    pub fn layouts(&self) -> impl Iterator<Item = AxisLayoutFlags> + '_ {
        AxisLayoutFlags::ALL
            .iter()
            .copied()
            .filter(move |layout| self.has(*layout))
    }
}

impl From<AxisLayoutFlags> for AxisLayoutSet {
    fn from(layout: AxisLayoutFlags) -> Self {
        layout.set_bit()
    }
}

impl FromIterator<AxisLayoutFlags> for AxisLayoutSet {
    fn from_iter<I: IntoIterator<Item = AxisLayoutFlags>>(iter: I) -> Self {
        iter.into_iter()
            .fold(AxisLayoutSet::empty(), |set, layout| set | layout.set_bit())
    }
}

/// Signed 16-bit value for every logical axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisState {
    values: [i16; AxisFlags::COUNT],
}

impl AxisState {
    pub const fn new() -> Self {
        Self {
            values: [0; AxisFlags::COUNT],
        }
    }

    pub fn get(&self, axis: AxisFlags) -> i16 {
        self.values.get(axis.index()).copied().unwrap_or(0)
    }

    /// Store `value`, clamping trigger axes to `0..=255`.
    pub fn set(&mut self, axis: AxisFlags, value: i16) {
        let value = if axis.is_trigger() {
            value.clamp(0, TRIGGER_MAX)
        } else {
            value
        };
        if let Some(slot) = self.values.get_mut(axis.index()) {
            *slot = value;
        }
    }

    /// Store a float sample, rounding and saturating it to the axis range.
    pub fn set_f32(&mut self, axis: AxisFlags, value: f32) {
        self.set(axis, saturate_i16(value));
    }

    /// `(x, y)` of a layout; the y component is zero for triggers.
    pub fn layout(&self, layout: AxisLayoutFlags) -> (i16, i16) {
        let x = self.get(layout.x_axis());
        let y = layout.y_axis().map_or(0, |axis| self.get(axis));
        (x, y)
    }

    pub fn set_layout(&mut self, layout: AxisLayoutFlags, x: i16, y: i16) {
        self.set(layout.x_axis(), x);
        if let Some(axis) = layout.y_axis() {
            self.set(axis, y);
        }
    }

    /// Copy every axis of `other`.
    pub fn overwrite(&mut self, other: &AxisState) {
        self.values = other.values;
    }

    pub fn clear(&mut self) {
        self.values = [0; AxisFlags::COUNT];
    }

    pub fn iter(&self) -> impl Iterator<Item = (AxisFlags, i16)> + '_ {
        AxisFlags::ALL.iter().map(move |axis| (*axis, self.get(*axis)))
    }
}

/// Round and saturate a float onto the signed 16-bit range.
pub fn saturate_i16(value: f32) -> i16 {
    if value.is_nan() {
        return 0;
    }
    value
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_axes_are_clamped() {
        let mut axes = AxisState::new();
        axes.set(AxisFlags::L2, 1000);
        axes.set(AxisFlags::R2, -5);
        assert_eq!(axes.get(AxisFlags::L2), 255);
        assert_eq!(axes.get(AxisFlags::R2), 0);
    }

    #[test]
    fn stick_axes_keep_full_range() {
        let mut axes = AxisState::new();
        axes.set(AxisFlags::LeftStickX, i16::MIN);
        axes.set(AxisFlags::LeftStickY, i16::MAX);
        assert_eq!(axes.layout(AxisLayoutFlags::LeftStick), (i16::MIN, i16::MAX));
    }

    #[test]
    fn saturate_handles_out_of_range() {
        assert_eq!(saturate_i16(1.0e9), i16::MAX);
        assert_eq!(saturate_i16(-1.0e9), i16::MIN);
        assert_eq!(saturate_i16(f32::NAN), 0);
        assert_eq!(saturate_i16(12.6), 13);
    }

    #[test]
    fn trigger_layout_has_no_y() {
        assert_eq!(AxisLayoutFlags::L2.y_axis(), None);
        let mut axes = AxisState::new();
        axes.set_layout(AxisLayoutFlags::R2, 128, 999);
        assert_eq!(axes.layout(AxisLayoutFlags::R2), (128, 0));
    }

    #[test]
    fn layout_set_round_trips_members() {
        let set: AxisLayoutSet = [AxisLayoutFlags::LeftPad, AxisLayoutFlags::Gyroscope]
            .into_iter()
            .collect();
        let back: Vec<_> = set.layouts().collect();
        assert_eq!(back, vec![AxisLayoutFlags::LeftPad, AxisLayoutFlags::Gyroscope]);
        assert!(AxisLayoutSet::COMMON.has(AxisLayoutFlags::L2));
        assert!(!AxisLayoutSet::COMMON.has(AxisLayoutFlags::Gyroscope));
    }
}
