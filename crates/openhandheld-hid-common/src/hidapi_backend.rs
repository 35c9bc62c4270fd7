//! `hidapi`-backed implementation of [`HidPort`] and [`HidDevice`].

use std::ffi::CString;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{HidCommonError, HidCommonResult, HidDevice, HidDeviceInfo, HidPort};

/// Largest input report any supported controller sends.
const MAX_REPORT_LEN: usize = 64;

pub struct HidApiPort {
    api: Mutex<hidapi::HidApi>,
}

impl HidApiPort {
    pub fn new() -> HidCommonResult<Self> {
        let api = hidapi::HidApi::new().map_err(|e| HidCommonError::OpenError(e.to_string()))?;
        Ok(Self {
            api: Mutex::new(api),
        })
    }

    fn snapshot(api: &hidapi::HidApi) -> Vec<HidDeviceInfo> {
        api.device_list()
            .map(|dev| {
                let mut info = HidDeviceInfo::new(
                    dev.vendor_id(),
                    dev.product_id(),
                    dev.path().to_string_lossy().into_owned(),
                )
                .with_interface(dev.interface_number())
                .with_usage_page(dev.usage_page());
                if let Some(serial) = dev.serial_number() {
                    info = info.with_serial(serial);
                }
                if let Some(manufacturer) = dev.manufacturer_string() {
                    info = info.with_manufacturer(manufacturer);
                }
                if let Some(product) = dev.product_string() {
                    info = info.with_product_name(product);
                }
                info
            })
            .collect()
    }
}

#[async_trait]
impl HidPort for HidApiPort {
    async fn list_devices(&self) -> HidCommonResult<Vec<HidDeviceInfo>> {
        let api = self.api.lock();
        Ok(Self::snapshot(&api))
    }

    fn open_device(&self, info: &HidDeviceInfo) -> HidCommonResult<Box<dyn HidDevice>> {
        let path = CString::new(info.path.clone())
            .map_err(|e| HidCommonError::OpenError(e.to_string()))?;
        let device = self
            .api
            .lock()
            .open_path(&path)
            .map_err(|e| HidCommonError::OpenError(format!("{}: {e}", info.path)))?;
        debug!(
            "Opened HID device VID=0x{:04X} PID=0x{:04X} path={}",
            info.vendor_id, info.product_id, info.path
        );
        Ok(Box::new(HidApiDevice {
            info: info.clone(),
            handle: Mutex::new(Some(device)),
            connected: AtomicBool::new(true),
        }))
    }

    async fn refresh(&self) -> HidCommonResult<()> {
        self.api
            .lock()
            .refresh_devices()
            .map_err(|e| HidCommonError::ReadError(e.to_string()))
    }
}

pub struct HidApiDevice {
    info: HidDeviceInfo,
    handle: Mutex<Option<hidapi::HidDevice>>,
    connected: AtomicBool,
}

impl HidApiDevice {
    fn mark_lost(&self, err: &hidapi::HidError) -> HidCommonError {
        warn!("HID device {} lost: {}", self.info.display_name(), err);
        self.connected.store(false, Ordering::Release);
        HidCommonError::Disconnected
    }
}

impl HidDevice for HidApiDevice {
    fn read_report(&self, timeout_ms: u32) -> HidCommonResult<Option<Vec<u8>>> {
        let guard = self.handle.lock();
        let device = guard.as_ref().ok_or(HidCommonError::Disconnected)?;
        let mut buf = vec![0u8; MAX_REPORT_LEN];
        let timeout = i32::try_from(timeout_ms).unwrap_or(i32::MAX);
        match device.read_timeout(&mut buf, timeout) {
            Ok(0) => Ok(None),
            Ok(len) => {
                buf.truncate(len);
                Ok(Some(buf))
            }
            Err(e) => Err(self.mark_lost(&e)),
        }
    }

    fn write_report(&self, data: &[u8]) -> HidCommonResult<usize> {
        let guard = self.handle.lock();
        let device = guard.as_ref().ok_or(HidCommonError::Disconnected)?;
        device
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn send_feature_report(&self, data: &[u8]) -> HidCommonResult<()> {
        let guard = self.handle.lock();
        let device = guard.as_ref().ok_or(HidCommonError::Disconnected)?;
        device
            .send_feature_report(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn get_device_info(&self) -> &HidDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn close(&self) -> HidCommonResult<()> {
        self.connected.store(false, Ordering::Release);
        self.handle.lock().take();
        Ok(())
    }
}
