//! Logical buttons and the bitset that holds them.
//!
//! Every physical control an adapter can decode is folded into one of the
//! [`ButtonFlags`] variants. A [`ButtonState`] is a fixed 128-bit set of
//! those flags; the discriminant of each variant is its bit index, so the
//! numbering below is part of the stable model and must not be reordered.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// A logical button in the canonical input model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ButtonFlags {
    /// South face button (A / Cross).
    B1 = 0,
    /// East face button (B / Circle).
    B2 = 1,
    /// West face button (X / Square).
    B3 = 2,
    /// North face button (Y / Triangle).
    B4 = 3,
    /// Extra vendor button.
    B5 = 4,
    /// Extra vendor button.
    B6 = 5,
    /// Extra vendor button.
    B7 = 6,
    /// Extra vendor button.
    B8 = 7,

    DPadUp = 8,
    DPadDown = 9,
    DPadLeft = 10,
    DPadRight = 11,

    Start = 12,
    Back = 13,
    /// Guide / PS / Steam button.
    Special = 14,
    Special2 = 15,

    OEM1 = 16,
    OEM2 = 17,
    OEM3 = 18,
    OEM4 = 19,
    OEM5 = 20,

    L1 = 21,
    R1 = 22,
    /// Left trigger past the soft threshold.
    L2Soft = 23,
    /// Left trigger past the full-pull threshold.
    L2Full = 24,
    R2Soft = 25,
    R2Full = 26,

    LeftStickClick = 27,
    RightStickClick = 28,
    LeftStickTouch = 29,
    RightStickTouch = 30,

    LeftStickUp = 31,
    LeftStickDown = 32,
    LeftStickLeft = 33,
    LeftStickRight = 34,
    RightStickUp = 35,
    RightStickDown = 36,
    RightStickLeft = 37,
    RightStickRight = 38,

    L4 = 39,
    R4 = 40,
    L5 = 41,
    R5 = 42,

    LeftPadTouch = 43,
    LeftPadClick = 44,
    LeftPadClickUp = 45,
    LeftPadClickDown = 46,
    LeftPadClickLeft = 47,
    LeftPadClickRight = 48,

    RightPadTouch = 49,
    RightPadClick = 50,
    RightPadClickUp = 51,
    RightPadClickDown = 52,
    RightPadClickLeft = 53,
    RightPadClickRight = 54,

    VolumeUp = 55,
    VolumeDown = 56,
}

impl ButtonFlags {
    /// Every flag, in bit order.
    pub const ALL: [ButtonFlags; 57] = [
        Self::B1,
        Self::B2,
        Self::B3,
        Self::B4,
        Self::B5,
        Self::B6,
        Self::B7,
        Self::B8,
        Self::DPadUp,
        Self::DPadDown,
        Self::DPadLeft,
        Self::DPadRight,
        Self::Start,
        Self::Back,
        Self::Special,
        Self::Special2,
        Self::OEM1,
        Self::OEM2,
        Self::OEM3,
        Self::OEM4,
        Self::OEM5,
        Self::L1,
        Self::R1,
        Self::L2Soft,
        Self::L2Full,
        Self::R2Soft,
        Self::R2Full,
        Self::LeftStickClick,
        Self::RightStickClick,
        Self::LeftStickTouch,
        Self::RightStickTouch,
        Self::LeftStickUp,
        Self::LeftStickDown,
        Self::LeftStickLeft,
        Self::LeftStickRight,
        Self::RightStickUp,
        Self::RightStickDown,
        Self::RightStickLeft,
        Self::RightStickRight,
        Self::L4,
        Self::R4,
        Self::L5,
        Self::R5,
        Self::LeftPadTouch,
        Self::LeftPadClick,
        Self::LeftPadClickUp,
        Self::LeftPadClickDown,
        Self::LeftPadClickLeft,
        Self::LeftPadClickRight,
        Self::RightPadTouch,
        Self::RightPadClick,
        Self::RightPadClickUp,
        Self::RightPadClickDown,
        Self::RightPadClickLeft,
        Self::RightPadClickRight,
        Self::VolumeUp,
        Self::VolumeDown,
    ];

    /// Bit index of this flag inside a [`ButtonState`].
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Look a flag up by its bit index.
    pub fn from_bit(bit: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(bit).ok()?).copied()
    }

    /// The set of buttons every XInput-style pad reports.
    pub fn common() -> ButtonState {
        [
            Self::B1,
            Self::B2,
            Self::B3,
            Self::B4,
            Self::DPadUp,
            Self::DPadDown,
            Self::DPadLeft,
            Self::DPadRight,
            Self::Start,
            Self::Back,
            Self::Special,
            Self::L1,
            Self::R1,
            Self::L2Soft,
            Self::R2Soft,
            Self::L2Full,
            Self::R2Full,
            Self::LeftStickClick,
            Self::RightStickClick,
            Self::LeftStickUp,
            Self::LeftStickDown,
            Self::LeftStickLeft,
            Self::LeftStickRight,
            Self::RightStickUp,
            Self::RightStickDown,
            Self::RightStickLeft,
            Self::RightStickRight,
        ]
        .into_iter()
        .collect()
    }
}

impl fmt::Display for ButtonFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Set of logical buttons currently held.
///
/// Merging two states is a logical OR, which is how injected buttons are
/// combined with the physical ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonState {
    bits: u128,
}

impl ButtonState {
    /// An empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Build a set from its raw bit representation.
    pub const fn from_bits(bits: u128) -> Self {
        Self { bits }
    }

    /// Raw bit representation.
    pub const fn bits(&self) -> u128 {
        self.bits
    }

    pub const fn is_pressed(&self, flag: ButtonFlags) -> bool {
        self.bits & (1u128 << flag.bit()) != 0
    }

    pub fn set(&mut self, flag: ButtonFlags, pressed: bool) {
        if pressed {
            self.bits |= 1u128 << flag.bit();
        } else {
            self.bits &= !(1u128 << flag.bit());
        }
    }

    /// OR `pressed` into the current value of `flag`.
    pub fn or(&mut self, flag: ButtonFlags, pressed: bool) {
        if pressed {
            self.bits |= 1u128 << flag.bit();
        }
    }

    pub fn press(&mut self, flag: ButtonFlags) {
        self.set(flag, true);
    }

    pub fn release(&mut self, flag: ButtonFlags) {
        self.set(flag, false);
    }

    /// Logical OR of both sets into `self`.
    pub fn merge(&mut self, other: &ButtonState) {
        self.bits |= other.bits;
    }

    /// Replace the whole set with `other`.
    pub fn overwrite(&mut self, other: &ButtonState) {
        self.bits = other.bits;
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn contains_all(&self, other: &ButtonState) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn intersects(&self, other: &ButtonState) -> bool {
        self.bits & other.bits != 0
    }

    /// Iterate the pressed flags in bit order.
    pub fn iter(&self) -> impl Iterator<Item = ButtonFlags> + '_ {
        ButtonFlags::ALL
            .iter()
            .copied()
            .filter(move |flag| self.is_pressed(*flag))
    }
}

impl FromIterator<ButtonFlags> for ButtonState {
    fn from_iter<I: IntoIterator<Item = ButtonFlags>>(iter: I) -> Self {
        let mut state = ButtonState::new();
        for flag in iter {
            state.press(flag);
        }
        state
    }
}

impl Extend<ButtonFlags> for ButtonState {
    fn extend<I: IntoIterator<Item = ButtonFlags>>(&mut self, iter: I) {
        for flag in iter {
            self.press(flag);
        }
    }
}

impl From<ButtonFlags> for ButtonState {
    fn from(flag: ButtonFlags) -> Self {
        let mut state = ButtonState::new();
        state.press(flag);
        state
    }
}

impl BitOr for ButtonState {
    type Output = ButtonState;

    fn bitor(self, rhs: Self) -> Self::Output {
        ButtonState::from_bits(self.bits | rhs.bits)
    }
}

impl BitOrAssign for ButtonState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_positions() {
        for (idx, flag) in ButtonFlags::ALL.iter().enumerate() {
            assert_eq!(flag.bit() as usize, idx, "{flag} out of order");
            assert_eq!(ButtonFlags::from_bit(flag.bit()), Some(*flag));
        }
        assert_eq!(ButtonFlags::from_bit(200), None);
    }

    #[test]
    fn set_and_release() {
        let mut state = ButtonState::new();
        state.press(ButtonFlags::B1);
        state.press(ButtonFlags::VolumeDown);
        assert!(state.is_pressed(ButtonFlags::B1));
        assert!(state.is_pressed(ButtonFlags::VolumeDown));
        assert_eq!(state.len(), 2);

        state.release(ButtonFlags::B1);
        assert!(!state.is_pressed(ButtonFlags::B1));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn or_never_clears() {
        let mut state = ButtonState::from(ButtonFlags::L1);
        state.or(ButtonFlags::L1, false);
        assert!(state.is_pressed(ButtonFlags::L1));
    }

    #[test]
    fn merge_is_logical_or() {
        let mut physical: ButtonState = [ButtonFlags::B1, ButtonFlags::Start].into_iter().collect();
        let injected: ButtonState = [ButtonFlags::B2, ButtonFlags::Start].into_iter().collect();
        physical.merge(&injected);

        let pressed: Vec<_> = physical.iter().collect();
        assert_eq!(
            pressed,
            vec![ButtonFlags::B1, ButtonFlags::B2, ButtonFlags::Start]
        );
    }

    #[test]
    fn overwrite_replaces() {
        let mut state = ButtonState::from(ButtonFlags::B1);
        state.overwrite(&ButtonState::from(ButtonFlags::B4));
        assert!(!state.is_pressed(ButtonFlags::B1));
        assert!(state.is_pressed(ButtonFlags::B4));
    }

    #[test]
    fn serde_is_transparent() -> Result<(), serde_json::Error> {
        let state = ButtonState::from(ButtonFlags::B3);
        let json = serde_json::to_string(&state)?;
        assert_eq!(json, "4");
        let back: ButtonState = serde_json::from_str(&json)?;
        assert_eq!(back, state);
        Ok(())
    }
}
