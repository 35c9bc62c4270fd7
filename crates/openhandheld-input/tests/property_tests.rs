//! Property tests for the canonical input state.

use openhandheld_input::prelude::*;
use proptest::prelude::*;

fn any_flag() -> impl Strategy<Value = ButtonFlags> {
    (0usize..ButtonFlags::ALL.len()).prop_map(|idx| ButtonFlags::ALL.get(idx).copied().unwrap_or(ButtonFlags::B1))
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// Merging never loses a button that either side held.
    #[test]
    fn prop_merge_is_union(a in any::<u64>(), b in any::<u64>()) {
        let mut left = ButtonState::from_bits(u128::from(a));
        let right = ButtonState::from_bits(u128::from(b));
        left.merge(&right);
        prop_assert_eq!(left.bits(), u128::from(a) | u128::from(b));
    }

    /// Setting one flag touches exactly one bit.
    #[test]
    fn prop_single_flag_sets_single_bit(flag in any_flag()) {
        let state = ButtonState::from(flag);
        prop_assert_eq!(state.len(), 1);
        prop_assert_eq!(state.iter().collect::<Vec<_>>(), vec![flag]);
    }

    /// Trigger axes always stay inside 0..=255.
    #[test]
    fn prop_trigger_range(value in any::<i16>()) {
        let mut axes = AxisState::new();
        axes.set(AxisFlags::L2, value);
        let stored = axes.get(AxisFlags::L2);
        prop_assert!((0..=255).contains(&stored));
    }
}
