use std::{
    net::IpAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use mdns_sd::{ServiceDaemon, ServiceInfo};

use crate::device::Device;

/// Accumulates devices as they are discovered.
///
/// Cloning yields another handle to the same list, so it can be moved into the thread
/// draining the browse channel while the caller keeps one to read the result.
#[derive(Debug, Clone, Default)]
pub struct DeviceCollector {
    devices: Arc<Mutex<Vec<Device>>>,
}

impl DeviceCollector {
    pub fn push(&self, device: Device) {
        self.lock().push(device);
    }

    /// Take everything collected so far, leaving the collector empty
    pub fn take(&self) -> Vec<Device> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Device>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<&ServiceInfo> for Device {
    fn from(info: &ServiceInfo) -> Self {
        let hostname = info
            .get_hostname()
            .split('.')
            .next()
            .unwrap_or_default()
            .to_uppercase();
        let ip = info
            .get_addresses()
            .iter()
            .find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4.to_string()),
                IpAddr::V6(_) => None,
            })
            .unwrap_or_default();
        let txt = |key: &str| info.get_property_val_str(key).map(str::to_owned);

        Self {
            hostname,
            ip,
            app: txt("app_name").unwrap_or_default(),
            version: txt("app_version").unwrap_or_default(),
            board: txt("target_board").unwrap_or_default(),
            mem_size: txt("mem_size"),
            sdk_size: txt("sdk_size"),
            free_space: txt("free_space"),
        }
    }
}

/// Shut down the daemon and wait for it to confirm, errors are only logged
pub fn mdns_daemon_shutdown(mdns: &ServiceDaemon) {
    match mdns.shutdown() {
        Ok(status_rx) => match status_rx.recv() {
            Ok(status) => log::debug!("Shutdown status: {status:?}"),
            Err(e) => log::error!("{e}"),
        },
        Err(e) => log::error!("{e}"),
    }
}
