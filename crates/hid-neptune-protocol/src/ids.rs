//! Valve USB vendor and product ID constants.
//!
//! The Steam Deck exposes its built-in controller as a composite device.
//! Only interface `MI_02` carries the vendor-defined input and feature
//! reports decoded by this crate; the other interfaces are the lizard-mode
//! keyboard and mouse.

/// Valve Corporation USB vendor id.
pub const VALVE_VENDOR_ID: u16 = 0x28DE;

/// Steam Deck built-in controller.
pub const STEAM_DECK_PRODUCT_ID: u16 = 0x1205;

/// Wired Steam Controller. Shares the feature command set, not the input layout.
pub const STEAM_CONTROLLER_WIRED_PRODUCT_ID: u16 = 0x1102;

/// Steam Controller wireless dongle.
pub const STEAM_CONTROLLER_WIRELESS_PRODUCT_ID: u16 = 0x1142;

/// USB interface number of the controller endpoint.
pub const NEPTUNE_INTERFACE: i32 = 2;

/// True for the Steam Deck controller.
pub fn is_neptune(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VALVE_VENDOR_ID && product_id == STEAM_DECK_PRODUCT_ID
}

pub fn product_name(product_id: u16) -> Option<&'static str> {
    match product_id {
        STEAM_DECK_PRODUCT_ID => Some("Steam Deck Controller"),
        STEAM_CONTROLLER_WIRED_PRODUCT_ID => Some("Steam Controller"),
        STEAM_CONTROLLER_WIRELESS_PRODUCT_ID => Some("Steam Controller (wireless)"),
        _ => None,
    }
}
