//! Prelude for the filters crate.

pub use crate::anti_deadzone::{anti_deadzone, anti_deadzone_scalar};
pub use crate::deadzone::{
    inner_outer_deadzone, radial_inner_outer_deadzone, trigger_inner_outer_deadzone,
};
pub use crate::shape::{
    improve_circularity, invert, map_range, map_short_to_unit, normalize_xbox_input, rotate,
};
pub use crate::smoothing::{LowPassState, OneEuroFilter, OneEuroPair};
pub use crate::{STICK_MAX, TRIGGER_MAX};
