//! Lenovo USB vendor and product ID constants.
//!
//! The Legion Go's detachable controllers enumerate as one composite device
//! whose product id reflects the mode selected on the controller. The
//! vendor-defined HID collection (usage page `0xFFA0`, usage `0x0001`)
//! carries the report decoded here in every mode.

pub const LENOVO_VENDOR_ID: u16 = 0x17EF;

pub const LEGION_GO_XINPUT: u16 = 0x6182;
pub const LEGION_GO_DINPUT: u16 = 0x6183;
pub const LEGION_GO_DUAL_DINPUT: u16 = 0x6184;
pub const LEGION_GO_FPS: u16 = 0x6185;

/// Usage page of the vendor collection.
pub const VENDOR_USAGE_PAGE: u16 = 0xFFA0;

pub const LEGION_GO_PRODUCT_IDS: [u16; 4] =
    [LEGION_GO_XINPUT, LEGION_GO_DINPUT, LEGION_GO_DUAL_DINPUT, LEGION_GO_FPS];

pub fn is_legion_go(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == LENOVO_VENDOR_ID && LEGION_GO_PRODUCT_IDS.contains(&product_id)
}

pub fn product_name(product_id: u16) -> Option<&'static str> {
    match product_id {
        LEGION_GO_XINPUT => Some("Legion Go Controller (XInput)"),
        LEGION_GO_DINPUT => Some("Legion Go Controller (DInput)"),
        LEGION_GO_DUAL_DINPUT => Some("Legion Go Controller (Dual DInput)"),
        LEGION_GO_FPS => Some("Legion Go Controller (FPS)"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_modes_are_recognised() {
        for pid in LEGION_GO_PRODUCT_IDS {
            assert!(is_legion_go(LENOVO_VENDOR_ID, pid));
            assert!(product_name(pid).is_some());
        }
        assert!(!is_legion_go(LENOVO_VENDOR_ID, 0x6186));
        assert!(!is_legion_go(0x28DE, LEGION_GO_XINPUT));
    }
}
