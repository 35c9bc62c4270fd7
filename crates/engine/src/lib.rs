//! Handheld companion engine.
//!
//! Controller adapters decode each physical pad into the canonical
//! [`ControllerState`](openhandheld_input::ControllerState); the
//! [`LayoutMapper`] turns that snapshot into the configured outputs; the
//! [`AppContext`] submits the result to the virtual target once per tick,
//! driven by the [`TickDriver`] thread.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod adapter;
pub mod context;
pub mod driver;
pub mod error;
pub mod layout;
pub mod prelude;

pub use adapter::{
    AdapterKind, AdapterOptions, AdapterStatus, ControllerAdapter, GyroSource, SensorOverrides,
    SensorScale, XInputSource, adapter_for, adapter_for_device, create_adapter,
};
pub use context::AppContext;
pub use driver::{DEFAULT_TICK_INTERVAL, TickDriver, TickHandle};
pub use error::{EngineError, EngineResult};
pub use layout::{LayoutConfig, LayoutMapper};
