//! Report hand-off between a device's read thread and the tick thread.
//!
//! The read thread owns the blocking `read_report` loop. Every report it
//! receives is copied once into a fresh `Arc<[u8]>` and swapped into the
//! [`ReportSlot`]. The tick thread takes a clone of that `Arc` and decodes
//! from it, so a tick never observes a half-written buffer and never holds
//! the slot lock while decoding.
//!
//! [`HidLink`] groups the device handle, the reader and the slot behind one
//! mutex. Open, close and teardown all go through it; closing stops and
//! joins the reader before the handle is released.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use openhandheld_errors::DeviceError;
use openhandheld_hid_common::{HidCommonError, HidDevice, HidDeviceInfo, HidPort};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, trace, warn};

use super::{AdapterStatus, StatusCell};

/// Latest raw report of one device.
#[derive(Debug, Default)]
pub struct ReportSlot {
    latest: RwLock<Option<Arc<[u8]>>>,
    received: AtomicU64,
}

impl ReportSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a report, replacing the previous one.
    pub fn store(&self, report: &[u8]) {
        let fresh: Arc<[u8]> = Arc::from(report);
        *self.latest.write() = Some(fresh);
        self.received.fetch_add(1, Ordering::Release);
    }

    pub fn latest(&self) -> Option<Arc<[u8]>> {
        self.latest.read().clone()
    }

    /// Reports stored since creation.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        *self.latest.write() = None;
    }
}

/// Background thread copying device reports into a [`ReportSlot`].
#[derive(Debug)]
pub struct ReportReader {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReportReader {
    /// Start reading. The thread exits when stopped or when the device
    /// reports that it is gone, in which case `status` is set to
    /// [`AdapterStatus::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the OS refuses a new thread.
    pub fn spawn(
        name: String,
        device: Arc<dyn HidDevice>,
        slot: Arc<ReportSlot>,
        status: StatusCell,
        timeout_ms: u32,
    ) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let label = name.clone();
        let handle = thread::Builder::new().name(name).spawn(move || {
            debug!("{} reader started", label);
            while flag.load(Ordering::Acquire) {
                match device.read_report(timeout_ms) {
                    Ok(Some(report)) => slot.store(&report),
                    Ok(None) => {}
                    Err(HidCommonError::Disconnected) => {
                        if flag.load(Ordering::Acquire) {
                            warn!("{} disconnected while reading", label);
                            status.store(AdapterStatus::Disconnected);
                        }
                        break;
                    }
                    Err(e) => {
                        trace!("{} read failed: {}", label, e);
                    }
                }
            }
            debug!("{} reader stopped", label);
        })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the thread and wait for it. Bounded by one read timeout.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let name = handle.thread().name().unwrap_or("reader").to_string();
            match handle.join() {
                Ok(()) => trace!("{} joined", name),
                Err(_) => error!("{} panicked", name),
            }
        }
    }
}

impl Drop for ReportReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Default)]
struct LinkInner {
    device: Option<Arc<dyn HidDevice>>,
    reader: Option<ReportReader>,
}

/// One adapter's HID handle, read thread and report slot.
pub struct HidLink {
    inner: Mutex<LinkInner>,
    slot: Arc<ReportSlot>,
    status: StatusCell,
    timeout_ms: u32,
}

impl std::fmt::Debug for HidLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidLink")
            .field("status", &self.status.load())
            .field("received", &self.slot.received())
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HidLink {
    pub fn new(status: StatusCell, timeout_ms: u32) -> Self {
        Self {
            inner: Mutex::new(LinkInner::default()),
            slot: Arc::new(ReportSlot::new()),
            status,
            timeout_ms,
        }
    }

    pub fn status(&self) -> AdapterStatus {
        self.status.load()
    }

    /// Open `info` and start its reader, closing any current device first.
    ///
    /// On failure the link is left closed and the status disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OpenFailed`] if the port cannot open the
    /// device or the reader thread cannot be started.
    pub fn open(&self, port: &dyn HidPort, info: &HidDeviceInfo) -> Result<(), DeviceError> {
        let mut inner = self.inner.lock();
        self.status.store(AdapterStatus::Busy);
        Self::teardown(&mut inner, &self.slot);

        let device: Arc<dyn HidDevice> = match port.open_device(info) {
            Ok(device) => Arc::from(device),
            Err(e) => {
                warn!("Couldn't open {}: {}", info.display_name(), e);
                self.status.store(AdapterStatus::Disconnected);
                return Err(DeviceError::OpenFailed {
                    device: info.display_name(),
                    reason: e.to_string(),
                });
            }
        };

        let name = format!("hid-{:04x}:{:04x}", info.vendor_id, info.product_id);
        let reader = match ReportReader::spawn(
            name,
            Arc::clone(&device),
            Arc::clone(&self.slot),
            self.status.clone(),
            self.timeout_ms,
        ) {
            Ok(reader) => reader,
            Err(e) => {
                warn!("Couldn't start reader for {}: {}", info.display_name(), e);
                if let Err(e) = device.close() {
                    debug!("Close after failed reader start: {}", e);
                }
                self.status.store(AdapterStatus::Disconnected);
                return Err(DeviceError::OpenFailed {
                    device: info.display_name(),
                    reason: e.to_string(),
                });
            }
        };

        inner.device = Some(device);
        inner.reader = Some(reader);
        self.status.store(AdapterStatus::Connected);
        info!("Opened {}", info.display_name());
        Ok(())
    }

    /// Stop the reader, then release the handle.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.device.is_none() {
            return;
        }
        self.status.store(AdapterStatus::Disposing);
        Self::teardown(&mut inner, &self.slot);
        self.status.store(AdapterStatus::Disconnected);
    }

    fn teardown(inner: &mut LinkInner, slot: &ReportSlot) {
        if let Some(mut reader) = inner.reader.take() {
            reader.stop();
        }
        if let Some(device) = inner.device.take() {
            if let Err(e) = device.close() {
                debug!("Close of {} failed: {}", device.get_device_info().display_name(), e);
            }
        }
        slot.clear();
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().device.is_some()
    }

    /// Reader still alive; false after the device went away.
    pub fn is_reading(&self) -> bool {
        self.inner.lock().reader.as_ref().is_some_and(ReportReader::is_running)
    }

    /// Latest report, shared with the slot.
    pub fn latest(&self) -> Option<Arc<[u8]>> {
        self.slot.latest()
    }

    pub fn slot(&self) -> &ReportSlot {
        &self.slot
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::Disconnected`] when no device is open, or the
    /// HID error of the write.
    pub fn send_feature_report(&self, data: &[u8]) -> Result<(), DeviceError> {
        let device = self.device()?;
        device
            .send_feature_report(data)
            .map_err(|e| DeviceError::HidError(e.to_string()))
    }

    /// # Errors
    ///
    /// As [`HidLink::send_feature_report`].
    pub fn write_report(&self, data: &[u8]) -> Result<usize, DeviceError> {
        let device = self.device()?;
        device
            .write_report(data)
            .map_err(|e| DeviceError::HidError(e.to_string()))
    }

    fn device(&self) -> Result<Arc<dyn HidDevice>, DeviceError> {
        self.inner
            .lock()
            .device
            .clone()
            .ok_or_else(|| DeviceError::Disconnected("no device open".to_string()))
    }
}

impl Drop for HidLink {
    fn drop(&mut self) {
        self.close();
    }
}
