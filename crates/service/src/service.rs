//! Daemon lifecycle: discover controllers, run the tick thread, stop on
//! a shutdown signal.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use handheld_companion_engine::{AdapterKind, AppContext, LayoutMapper, TickDriver, adapter_for_device};
use openhandheld_errors::CompanionError;
use openhandheld_hid_common::{HidDeviceInfo, HidPort};
use openhandheld_targets::{VirtualBus, VirtualTarget};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::sink::TracingSink;

/// How often the wait loop checks whether the tick thread has ended.
const WATCH_INTERVAL: Duration = Duration::from_millis(100);

/// One enumerated HID interface and the adapter that would drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceListing {
    pub info: HidDeviceInfo,
    pub adapter: Option<AdapterKind>,
}

impl fmt::Display for DeviceListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adapter = self.adapter.map_or("unsupported", AdapterKind::name);
        write!(
            f,
            "{:04X}:{:04X}  if={:<2} {:<24} {}  ({})",
            self.info.vendor_id,
            self.info.product_id,
            self.info.interface_number,
            adapter,
            self.info.display_name(),
            self.info.path
        )
    }
}

/// Enumerate `port`, supported devices first.
///
/// # Errors
///
/// Fails when the port cannot be enumerated.
pub async fn list_devices(port: &dyn HidPort) -> Result<Vec<DeviceListing>> {
    let mut listings: Vec<DeviceListing> = port
        .list_devices()
        .await
        .context("Failed to enumerate HID devices")?
        .into_iter()
        .map(|info| DeviceListing {
            adapter: adapter_for_device(&info),
            info,
        })
        .collect();
    listings.sort_by_key(|listing| (listing.adapter.is_none(), listing.info.vendor_id, listing.info.product_id));
    Ok(listings)
}

#[derive(Debug)]
pub struct CompanionService {
    config: ServiceConfig,
}

impl CompanionService {
    /// # Errors
    ///
    /// Fails when the configuration does not validate.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate().context("Invalid service configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build the context for one run with `bus` backing the virtual pad.
    ///
    /// # Errors
    ///
    /// Fails when the layout is rejected by the mapper.
    pub fn build_context(&self, bus: Box<dyn VirtualBus>) -> Result<AppContext> {
        let target = VirtualTarget::new(self.config.target, bus, self.config.tick_interval());
        let mapper = LayoutMapper::new(self.config.layout.clone()).context("Invalid layout")?;
        Ok(AppContext::new(target, mapper, Box::new(TracingSink::new())).with_options(self.config.adapter_options()))
    }

    /// Attach every supported device on `port`. A device that fails to open
    /// is logged and skipped. Returns the number attached.
    ///
    /// # Errors
    ///
    /// Fails when the port cannot be enumerated.
    pub async fn discover(context: &mut AppContext, port: &dyn HidPort) -> Result<usize> {
        let mut attached = 0;
        for listing in list_devices(port).await? {
            if listing.adapter.is_none() {
                continue;
            }
            match context.attach_device(port, &listing.info) {
                Ok(Some(kind)) => {
                    info!("Found {} at {}", kind, listing.info.path);
                    attached += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    let err = CompanionError::from(e);
                    if !err.is_recoverable() {
                        return Err(err).with_context(|| format!("Cannot attach {}", listing.info.path));
                    }
                    warn!(
                        "Skipping {} [{} {}]: {}",
                        listing.info.path,
                        err.category(),
                        err.severity(),
                        err
                    );
                }
            }
        }

        if attached == 0 {
            match context.attach_xinput(None) {
                Ok(user) => {
                    info!("Using XInput controller {}", user);
                    attached += 1;
                }
                Err(e) => debug!("No XInput fallback: {}", e),
            }
        }
        Ok(attached)
    }

    /// Run until `shutdown` resolves or the peer asks the daemon to stop.
    ///
    /// # Errors
    ///
    /// Fails on enumeration, thread spawn or join failures.
    pub async fn run_with<F>(self, port: &dyn HidPort, bus: Box<dyn VirtualBus>, shutdown: F) -> Result<AppContext>
    where
        F: Future<Output = ()>,
    {
        let mut context = self.build_context(bus)?;
        let found = Self::discover(&mut context, port).await?;
        if found == 0 {
            warn!("No supported controller found; the virtual pad will stay idle");
        }

        let handle = TickDriver::new(self.config.tick_interval())
            .spawn(context)
            .context("Failed to start tick thread")?;

        let stopped = async {
            let mut watch = tokio::time::interval(WATCH_INTERVAL);
            while handle.is_running() {
                watch.tick().await;
            }
        };
        tokio::select! {
            () = shutdown => info!("Shutdown requested"),
            () = stopped => info!("Tick thread ended"),
        }

        info!("Stopping after {} ticks", handle.ticks());
        let context = tokio::task::spawn_blocking(move || handle.stop())
            .await
            .context("Tick thread join task failed")?
            .map_err(CompanionError::from)
            .context("Tick thread failed")?;
        Ok(context)
    }
}
