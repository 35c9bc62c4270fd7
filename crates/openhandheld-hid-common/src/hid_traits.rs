//! HID device traits
//!
//! A [`HidDevice`] is shared between an adapter's reader thread and the tick
//! thread (which writes rumble and configuration), so every method takes
//! `&self` and implementations synchronize internally.

use crate::{HidCommonError, HidCommonResult, HidDeviceInfo};
use async_trait::async_trait;

pub trait HidDevice: Send + Sync {
    /// Block for at most `timeout_ms` waiting for one input report.
    ///
    /// Returns `Ok(None)` when the timeout elapses without data. Every report
    /// is returned in a freshly allocated buffer.
    fn read_report(&self, timeout_ms: u32) -> HidCommonResult<Option<Vec<u8>>>;

    fn write_report(&self, data: &[u8]) -> HidCommonResult<usize>;

    fn send_feature_report(&self, data: &[u8]) -> HidCommonResult<()>;

    fn get_device_info(&self) -> &HidDeviceInfo;

    fn is_connected(&self) -> bool;

    fn close(&self) -> HidCommonResult<()>;
}

#[async_trait]
pub trait HidPort: Send + Sync {
    async fn list_devices(&self) -> HidCommonResult<Vec<HidDeviceInfo>>;

    fn open_device(&self, info: &HidDeviceInfo) -> HidCommonResult<Box<dyn HidDevice>>;

    async fn refresh(&self) -> HidCommonResult<()>;
}

pub mod mock {
    use super::*;
    use std::collections::{HashSet, VecDeque};
    use std::sync::{Arc, Mutex};

    /// In-memory device. Clones share the same queues, so a test can keep a
    /// handle after boxing one into an adapter.
    #[derive(Clone)]
    pub struct MockHidDevice {
        info: HidDeviceInfo,
        read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        write_history: Arc<Mutex<Vec<Vec<u8>>>>,
        feature_history: Arc<Mutex<Vec<Vec<u8>>>>,
        connected: Arc<Mutex<bool>>,
    }

    impl MockHidDevice {
        pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
            Self::from_info(HidDeviceInfo::new(vendor_id, product_id, path))
        }

        pub fn from_info(info: HidDeviceInfo) -> Self {
            Self {
                info,
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                write_history: Arc::new(Mutex::new(Vec::new())),
                feature_history: Arc::new(Mutex::new(Vec::new())),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        pub fn queue_read(&self, data: Vec<u8>) {
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(data);
        }

        pub fn pending_reads(&self) -> usize {
            self.read_queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .len()
        }

        pub fn get_write_history(&self) -> Vec<Vec<u8>> {
            let history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        pub fn get_feature_history(&self) -> Vec<Vec<u8>> {
            let history = self
                .feature_history
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            history.clone()
        }

        pub fn disconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = false;
        }

        pub fn reconnect(&self) {
            let mut connected = self.connected.lock().unwrap_or_else(|e| e.into_inner());
            *connected = true;
        }

        fn connected(&self) -> bool {
            *self.connected.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    impl HidDevice for MockHidDevice {
        fn read_report(&self, timeout_ms: u32) -> HidCommonResult<Option<Vec<u8>>> {
            if !self.connected() {
                return Err(HidCommonError::Disconnected);
            }

            let next = {
                let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
                queue.pop_front()
            };
            if next.is_none() && timeout_ms > 0 {
                std::thread::sleep(std::time::Duration::from_millis(u64::from(timeout_ms.min(5))));
            }
            Ok(next)
        }

        fn write_report(&self, data: &[u8]) -> HidCommonResult<usize> {
            if !self.connected() {
                return Err(HidCommonError::Disconnected);
            }

            let mut history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(data.len())
        }

        fn send_feature_report(&self, data: &[u8]) -> HidCommonResult<()> {
            if !self.connected() {
                return Err(HidCommonError::Disconnected);
            }

            let mut history = self
                .feature_history
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            history.push(data.to_vec());
            Ok(())
        }

        fn get_device_info(&self) -> &HidDeviceInfo {
            &self.info
        }

        fn is_connected(&self) -> bool {
            self.connected()
        }

        fn close(&self) -> HidCommonResult<()> {
            self.disconnect();
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockHidPort {
        devices: Vec<MockHidDevice>,
        failing: Mutex<HashSet<String>>,
    }

    impl MockHidPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_device(&mut self, device: MockHidDevice) {
            self.devices.push(device);
        }

        pub fn device_count(&self) -> usize {
            self.devices.len()
        }

        /// Make every open of `path` fail until [`MockHidPort::allow_open`].
        pub fn fail_open(&self, path: impl Into<String>) {
            let mut failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
            failing.insert(path.into());
        }

        pub fn allow_open(&self, path: &str) {
            let mut failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
            failing.remove(path);
        }
    }

    #[async_trait]
    impl HidPort for MockHidPort {
        async fn list_devices(&self) -> HidCommonResult<Vec<HidDeviceInfo>> {
            Ok(self
                .devices
                .iter()
                .map(|d| d.get_device_info().clone())
                .collect())
        }

        fn open_device(&self, info: &HidDeviceInfo) -> HidCommonResult<Box<dyn HidDevice>> {
            let failing = self
                .failing
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .contains(&info.path);
            if failing {
                return Err(HidCommonError::OpenError(format!(
                    "access denied: {}",
                    info.path
                )));
            }

            for device in &self.devices {
                if device.info.path == info.path {
                    device.reconnect();
                    return Ok(Box::new(device.clone()));
                }
            }
            Err(HidCommonError::DeviceNotFound(info.path.clone()))
        }

        async fn refresh(&self) -> HidCommonResult<()> {
            Ok(())
        }
    }
}
