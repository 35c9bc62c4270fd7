//! Property-based tests for DualSense report decoding.

use handheld_hid_dualsense_protocol::{
    REPORT_ID, TOUCHPAD_HEIGHT, TOUCHPAD_WIDTH, TouchContact, axis_from_byte,
    inverted_axis_from_byte, parse, rumble_report,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    #[test]
    fn prop_parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..80)) {
        let _result = parse(&data);
    }

    #[test]
    fn prop_any_usb_report_decodes(body in proptest::collection::vec(any::<u8>(), 0..63)) {
        let mut data = vec![REPORT_ID];
        data.extend(body);
        let parsed = parse(&data);
        prop_assert!(parsed.is_ok());
        if let Ok(report) = parsed {
            prop_assert!(report.battery <= 10);
        }
    }

    #[test]
    fn prop_axis_mapping_is_monotonic(a in any::<u8>(), b in any::<u8>()) {
        prop_assume!(a < b);
        prop_assert!(axis_from_byte(a) < axis_from_byte(b));
        prop_assert!(inverted_axis_from_byte(a) > inverted_axis_from_byte(b));
    }

    #[test]
    fn prop_touch_coordinates_fit_twelve_bits(bytes in any::<[u8; 4]>()) {
        let contact = TouchContact::unpack(bytes);
        prop_assert!(contact.x < 4096 && contact.y < 4096);
        prop_assert!(contact.id < 0x80);
    }

    #[test]
    fn prop_in_range_touch_is_preserved(x in 0u16..TOUCHPAD_WIDTH, y in 0u16..TOUCHPAD_HEIGHT) {
        let [x_lo, x_hi] = x.to_le_bytes();
        let bytes = [0x01, x_lo, (x_hi & 0x0F) | ((y as u8 & 0x0F) << 4), (y >> 4) as u8];
        let contact = TouchContact::unpack(bytes);
        prop_assert_eq!((contact.x, contact.y), (x, y));
    }

    #[test]
    fn prop_rumble_tail_is_zero(large in any::<u8>(), small in any::<u8>()) {
        let report = rumble_report(large, small);
        prop_assert!(report.iter().skip(5).all(|b| *b == 0));
    }
}
