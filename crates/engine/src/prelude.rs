//! Common engine imports.

pub use crate::adapter::{
    AdapterKind, AdapterOptions, AdapterStatus, ControllerAdapter, MemoryXInput, NoXInput,
    XInputSource,
};
pub use crate::context::AppContext;
pub use crate::driver::{TickDriver, TickHandle};
pub use crate::error::{EngineError, EngineResult};
pub use crate::layout::{LayoutConfig, LayoutMapper};
