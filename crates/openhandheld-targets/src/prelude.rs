//! Common imports for target users.

pub use crate::bus::{Feedback, NullBus, TargetKind, VirtualBus};
pub use crate::dualshock4::Ds4ReportBuilder;
pub use crate::target::VirtualTarget;
pub use crate::touch::{Ds4Touch, TouchFinger};
pub use crate::xbox360::Xbox360Report;
