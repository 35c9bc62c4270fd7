//! Handheld companion daemon.
//!
//! Loads a [`ServiceConfig`], discovers supported controllers over HID and
//! runs the engine's tick thread until interrupted.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod service;
pub mod sink;

pub use cli::{Cli, Command, TargetArg};
pub use config::ServiceConfig;
pub use service::{CompanionService, DeviceListing, list_devices};
pub use sink::TracingSink;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_ascii_lowercase()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
