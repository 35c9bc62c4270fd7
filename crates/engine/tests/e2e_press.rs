//! End-to-end: a pad button through the layout to a keyboard key.
//!
//! A short press on B1 held for three 10 ms ticks must produce exactly one
//! key-down on the release tick and the matching key-up on the next one.

use std::sync::Arc;
use std::time::Duration;

use handheld_companion_engine::prelude::*;
use handheld_hid_xinput_protocol::{XInputButtons, XInputGamepad, XInputState};
use openhandheld_actions::{ActionConfig, KeyCode, OutputEvent, PressConfig, PressType};
use openhandheld_input::ButtonFlags;
use openhandheld_targets::{TargetKind, VirtualTarget, mock::MockBus};
use openhandheld_test_helpers::prelude::*;

const KEY_A: KeyCode = KeyCode(0x41);

fn pad(buttons: XInputButtons) -> XInputState {
    XInputState {
        packet_number: 1,
        gamepad: XInputGamepad {
            buttons,
            ..XInputGamepad::default()
        },
    }
}

fn short_press_layout() -> LayoutConfig {
    let press = PressConfig {
        press_type: PressType::Short,
        long_press_ms: 450.0,
        ..PressConfig::default()
    };
    LayoutConfig::empty().bind_button(ButtonFlags::B1, ActionConfig::keyboard(vec![KEY_A]).with_press(press))
}

#[test]
fn short_press_emits_one_key_stroke() -> TestResult {
    let bus = MockBus::new();
    let sink = RecordingSink::new();
    let xinput = MemoryXInput::new();
    let target = VirtualTarget::new(TargetKind::Xbox360, Box::new(bus.clone()), Duration::from_millis(10));
    let mut context = AppContext::new(target, LayoutMapper::new(short_press_layout())?, Box::new(sink.clone()))
        .with_xinput(Arc::new(xinput.clone()));
    context.start();

    xinput.set_state(0, pad(XInputButtons::A));
    assert_eq!(context.attach_xinput(Some(0))?, 0);

    let mut keys_by_tick = Vec::new();
    for tick in 1..=6_u64 {
        if tick == 4 {
            xinput.set_state(0, pad(XInputButtons::empty()));
        }
        sink.clear();
        context.tick(tick, 10.0);
        keys_by_tick.push((tick, sink.events()));
    }

    let strokes: Vec<_> = keys_by_tick
        .iter()
        .filter(|(_, events)| !events.is_empty())
        .cloned()
        .collect();
    assert_eq!(
        strokes,
        vec![
            (4, vec![OutputEvent::KeyDown(KEY_A)]),
            (5, vec![OutputEvent::KeyUp(KEY_A)]),
        ]
    );

    // The key is bound, so B1 never reaches the virtual pad.
    assert!(!context.last_output().buttons.is_pressed(ButtonFlags::B1));
    assert!(bus.last_report().is_some());
    Ok(())
}

#[test]
fn held_past_threshold_emits_nothing() -> TestResult {
    let sink = RecordingSink::new();
    let xinput = MemoryXInput::new();
    let target = VirtualTarget::new(TargetKind::Xbox360, Box::new(MockBus::new()), Duration::from_millis(10));
    let mut context = AppContext::new(target, LayoutMapper::new(short_press_layout())?, Box::new(sink.clone()))
        .with_xinput(Arc::new(xinput.clone()));
    context.start();

    xinput.set_state(0, pad(XInputButtons::A));
    context.attach_xinput(None)?;
    for tick in 1..=50_u64 {
        context.tick(tick, 10.0);
    }
    xinput.set_state(0, pad(XInputButtons::empty()));
    for tick in 51..=53_u64 {
        context.tick(tick, 10.0);
    }

    assert!(sink.key_downs().is_empty());
    assert!(sink.key_ups().is_empty());
    Ok(())
}
