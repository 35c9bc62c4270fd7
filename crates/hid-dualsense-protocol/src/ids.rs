//! Sony USB vendor and product ID constants.

/// Sony Interactive Entertainment USB vendor id.
pub const SONY_VENDOR_ID: u16 = 0x054C;

/// DualSense (CFI-ZCT1).
pub const DUALSENSE_PRODUCT_ID: u16 = 0x0CE6;

/// DualSense Edge (CFI-ZCP1).
pub const DUALSENSE_EDGE_PRODUCT_ID: u16 = 0x0DF2;

pub fn is_dualsense(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == SONY_VENDOR_ID
        && matches!(product_id, DUALSENSE_PRODUCT_ID | DUALSENSE_EDGE_PRODUCT_ID)
}

pub fn product_name(product_id: u16) -> Option<&'static str> {
    match product_id {
        DUALSENSE_PRODUCT_ID => Some("DualSense Wireless Controller"),
        DUALSENSE_EDGE_PRODUCT_ID => Some("DualSense Edge Wireless Controller"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dualsense_family() {
        assert!(is_dualsense(0x054C, 0x0CE6));
        assert!(is_dualsense(0x054C, 0x0DF2));
        assert!(!is_dualsense(0x054C, 0x09CC));
        assert_eq!(product_name(0x09CC), None);
    }
}
