use anyhow::{bail, Result};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// A device discovered on the network, as advertised in its mDNS TXT record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    /// Uppercased first label of the advertised server name
    pub hostname: String,
    /// Textual IPv4 address, empty if none was advertised
    pub ip: String,
    pub app: String,
    pub version: String,
    /// Target board identifier (`target_board` TXT key)
    pub board: String,
    /// Flash memory size in KiB
    pub mem_size: Option<String>,
    /// SDK partition size in KiB
    pub sdk_size: Option<String>,
    pub free_space: Option<String>,
}

/// The fields a device list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DeviceField {
    Hostname,
    Ip,
    App,
    Version,
    Device,
    MemSize,
    SdkSize,
    FreeSpace,
}

impl Device {
    /// Value of `field`, `None` if the device did not advertise it
    pub fn get(&self, field: DeviceField) -> Option<&str> {
        match field {
            DeviceField::Hostname => Some(self.hostname.as_str()),
            DeviceField::Ip => Some(self.ip.as_str()),
            DeviceField::App => Some(self.app.as_str()),
            DeviceField::Version => Some(self.version.as_str()),
            DeviceField::Device => Some(self.board.as_str()),
            DeviceField::MemSize => self.mem_size.as_deref(),
            DeviceField::SdkSize => self.sdk_size.as_deref(),
            DeviceField::FreeSpace => self.free_space.as_deref(),
        }
    }

    pub fn has(&self, field: DeviceField) -> bool {
        self.get(field).is_some()
    }

    /// Memory size in MiB, known only when the flash and SDK sizes agree
    pub fn mem_size_mb(&self) -> Option<u32> {
        match (self.mem_size.as_deref(), self.sdk_size.as_deref()) {
            (Some(mem), Some(sdk)) if mem == sdk => kib_to_mb(mem, "mem_size"),
            _ => None,
        }
    }

    /// Memory size in MiB derived from the SDK partition size alone
    pub fn sdk_size_mb(&self) -> Option<u32> {
        self.sdk_size
            .as_deref()
            .and_then(|sdk| kib_to_mb(sdk, "sdk_size"))
    }
}

fn kib_to_mb(raw: &str, field_name: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(kib) => Some(kib / 1024).filter(|&mb| mb > 0),
        Err(e) => {
            log::warn!("Ignoring non-numeric {field_name} '{raw}': {e}");
            None
        }
    }
}

/// Sort `devices` ascending by the field named `field` (case-insensitive).
///
/// The field has to exist on the first device, otherwise the list is left untouched
/// and an `Unknown field` error is returned. Devices missing the field sort first.
pub fn sort_devices(devices: &mut [Device], field: &str) -> Result<()> {
    let field_name = field.to_lowercase();
    let field = match DeviceField::from_str(&field_name) {
        Ok(f) if devices.first().map_or(true, |d| d.has(f)) => f,
        _ => bail!("Unknown field '{field_name}'"),
    };
    log::debug!("Sorting {} device(s) by {field}", devices.len());
    devices.sort_by(|a, b| {
        a.get(field)
            .unwrap_or_default()
            .cmp(b.get(field).unwrap_or_default())
    });
    Ok(())
}

/// Find a device by hostname, ignoring case
pub fn find_by_hostname<'d>(devices: &'d [Device], hostname: &str) -> Option<&'d Device> {
    let hostname = hostname.to_lowercase();
    devices
        .iter()
        .find(|d| d.hostname.to_lowercase() == hostname)
}
