use anyhow::{Context, Result};
use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::{
    collections::HashSet,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use crate::{
    device::Device,
    mdns::util::{self, DeviceCollector},
};

/// Browse for `service_type` for `timeout_ms` and return every device resolved in that window.
///
/// Each advertised service instance yields one [Device], in the order they were first resolved.
pub fn discover_devices(service_type: &str, timeout_ms: u64) -> Result<Vec<Device>> {
    let stopflag = AtomicBool::new(false);
    let collector = DeviceCollector::default();

    let mdns = ServiceDaemon::new().context("Failed to create mDNS daemon")?;
    log::info!("Browsing for {service_type}");
    let receiver = mdns
        .browse(service_type)
        .with_context(|| format!("Failed to browse for {service_type}"))?;

    thread::scope(|s| {
        let mut instances = ServiceInstances::new(collector.clone());
        let receiver = &receiver;
        let stopflag = &stopflag;
        s.spawn(move || {
            while !stopflag.load(Ordering::Relaxed) {
                while let Ok(event) = receiver.try_recv() {
                    instances.handle_event(event);
                }
                thread::sleep(Duration::from_millis(10));
            }
            // Whatever arrived during the last tick
            while let Ok(event) = receiver.try_recv() {
                instances.handle_event(event);
            }
        });
        s.spawn(|| {
            let start_time = Instant::now();
            while start_time.elapsed() < Duration::from_millis(timeout_ms) {
                thread::sleep(Duration::from_millis(10));
            }
            stopflag.store(true, Ordering::Relaxed);
            util::mdns_daemon_shutdown(&mdns);
        });
    });

    let devices = collector.take();
    log::info!(
        "Discovered {} device{}",
        devices.len(),
        if devices.len() == 1 { "" } else { "s" }
    );
    Ok(devices)
}

/// Tracks which service instances are currently advertised.
///
/// `mdns-sd` resolves an instance again when its records change or when it is seen on
/// another interface, only the first resolution is collected. A removed instance is
/// collected again if it is advertised anew.
#[derive(Debug)]
pub struct ServiceInstances {
    seen: HashSet<String>,
    collector: DeviceCollector,
}

impl ServiceInstances {
    pub fn new(collector: DeviceCollector) -> Self {
        Self {
            seen: HashSet::new(),
            collector,
        }
    }

    pub fn handle_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::ServiceResolved(info) => {
                if !self.seen.insert(info.get_fullname().to_owned()) {
                    log::debug!("Already collected {}", info.get_fullname());
                    return;
                }
                log::info!("Resolved a new service: {}", info.get_fullname());
                log::debug!("Hostname: {}", info.get_hostname());
                log::debug!("IP: {:?}", info.get_addresses());
                self.collector.push(Device::from(&info));
            }
            ServiceEvent::ServiceRemoved(_, fullname) => {
                log::debug!("Service removed: {fullname}");
                self.seen.remove(&fullname);
            }
            other_event => {
                log::trace!("Received other event: {:?}", &other_event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdns_sd::ServiceInfo;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use testresult::TestResult;

    const SERVICE_TYPE: &str = "_arduino._tcp.local.";

    fn resolved(instance: &str, free_space: &str) -> Result<ServiceEvent> {
        let properties = HashMap::from([
            ("target_board".to_owned(), "NODEMCU_LOLIN".to_owned()),
            ("free_space".to_owned(), free_space.to_owned()),
        ]);
        let info = ServiceInfo::new(
            SERVICE_TYPE,
            instance,
            &format!("{instance}.local."),
            "192.168.1.20",
            8266,
            properties,
        )?;
        Ok(ServiceEvent::ServiceResolved(info))
    }

    fn removed(instance: &str) -> ServiceEvent {
        ServiceEvent::ServiceRemoved(
            SERVICE_TYPE.to_owned(),
            format!("{instance}.{SERVICE_TYPE}"),
        )
    }

    #[test]
    fn test_repeated_resolution_collected_once() -> TestResult {
        let collector = DeviceCollector::default();
        let mut instances = ServiceInstances::new(collector.clone());

        instances.handle_event(resolved("espurna-aa11", "1000")?);
        // Updated TXT record, same instance
        instances.handle_event(resolved("espurna-aa11", "900")?);
        instances.handle_event(resolved("espurna-bb22", "1000")?);

        let devices = collector.take();
        let hostnames: Vec<&str> = devices.iter().map(|d| d.hostname.as_str()).collect();
        assert_eq!(hostnames, ["ESPURNA-AA11", "ESPURNA-BB22"]);
        assert_eq!(devices[0].free_space.as_deref(), Some("1000"));
        Ok(())
    }

    #[test]
    fn test_readvertised_after_removal_collected_again() -> TestResult {
        let collector = DeviceCollector::default();
        let mut instances = ServiceInstances::new(collector.clone());

        instances.handle_event(resolved("espurna-aa11", "1000")?);
        instances.handle_event(removed("espurna-aa11"));
        instances.handle_event(resolved("espurna-aa11", "900")?);

        let devices = collector.take();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].free_space.as_deref(), Some("900"));
        Ok(())
    }

    #[test]
    fn test_other_events_ignored() {
        let collector = DeviceCollector::default();
        let mut instances = ServiceInstances::new(collector.clone());
        instances.handle_event(ServiceEvent::SearchStarted(SERVICE_TYPE.to_owned()));
        instances.handle_event(removed("espurna-zz99"));
        assert!(collector.take().is_empty());
    }
}
