//! USB identities presented by the virtual gamepads.
//!
//! The bus creates each target with the vendor and product id of the pad it
//! imitates, so games apply their stock Xbox 360 or DualShock 4 mappings.

/// Microsoft vendor id, used for the Xbox 360 target.
pub const XBOX360_VENDOR_ID: u16 = 0x045E;

/// Xbox 360 wired controller.
pub const XBOX360_PRODUCT_ID: u16 = 0x028E;

/// Sony vendor id, used for the DualShock 4 target.
pub const DS4_VENDOR_ID: u16 = 0x054C;

/// DualShock 4 v2 (CUH-ZCT2).
pub const DS4_PRODUCT_ID: u16 = 0x09CC;
