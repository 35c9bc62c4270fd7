//! Property-based tests for the press machine.

use openhandheld_actions::prelude::*;
use proptest::prelude::*;

const TICK_MS: f32 = 10.0;

fn rising_edges(machine: &mut PressMachine, inputs: impl IntoIterator<Item = bool>) -> usize {
    inputs
        .into_iter()
        .filter(|p| machine.update(*p, TICK_MS).rising())
        .count()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    #[test]
    fn prop_turbo_is_square_wave(delay in 1u32..12, held in 1usize..120) {
        let mut machine = PressMachine::new(PressConfig {
            turbo: true,
            turbo_delay: delay,
            ..PressConfig::default()
        });
        let delay = delay as usize;
        for i in 0..held {
            let expected = (i / delay) % 2 == 0;
            prop_assert_eq!(machine.update(true, TICK_MS).value, expected, "tick {}", i);
        }
    }

    #[test]
    fn prop_turbo_false_while_released(
        delay in 1u32..12,
        inputs in proptest::collection::vec(any::<bool>(), 1..200),
    ) {
        let mut machine = PressMachine::new(PressConfig {
            turbo: true,
            turbo_delay: delay,
            ..PressConfig::default()
        });
        for pressed in inputs {
            let out = machine.update(pressed, TICK_MS);
            if !pressed {
                prop_assert!(!out.value);
            }
        }
    }

    #[test]
    fn prop_short_and_long_are_exclusive(held_ticks in 1usize..100, threshold_ticks in 1u32..60) {
        let threshold = threshold_ticks as f32 * TICK_MS;
        let gesture: Vec<bool> = std::iter::repeat_n(true, held_ticks)
            .chain(std::iter::repeat_n(false, 3))
            .collect();

        let mut short = PressMachine::new(PressConfig {
            press_type: PressType::Short,
            long_press_ms: threshold,
            ..PressConfig::default()
        });
        let mut long = PressMachine::new(PressConfig {
            press_type: PressType::Long,
            long_press_ms: threshold,
            ..PressConfig::default()
        });

        let short_fired = rising_edges(&mut short, gesture.iter().copied());
        let long_fired = rising_edges(&mut long, gesture.iter().copied());

        prop_assert_eq!(short_fired + long_fired, 1);
        let held_ms = held_ticks as f32 * TICK_MS;
        prop_assert_eq!(short_fired == 1, held_ms < threshold);
        prop_assert_eq!(long_fired == 1, held_ms >= threshold);
    }

    #[test]
    fn prop_toggle_latch_is_false_when_not_configured(
        inputs in proptest::collection::vec(any::<bool>(), 1..100),
    ) {
        let mut machine = PressMachine::new(PressConfig::default());
        for pressed in inputs {
            machine.update(pressed, TICK_MS);
            prop_assert!(!machine.is_toggled());
        }
    }

    #[test]
    fn prop_edges_alternate(inputs in proptest::collection::vec(any::<bool>(), 1..200), toggle: bool, turbo: bool) {
        let mut machine = PressMachine::new(PressConfig {
            toggle,
            turbo,
            turbo_delay: 2,
            ..PressConfig::default()
        });
        let mut last = None;
        for pressed in inputs {
            if let Some(edge) = machine.update(pressed, TICK_MS).edge {
                prop_assert_ne!(Some(edge), last);
                last = Some(edge);
            }
        }
    }
}
