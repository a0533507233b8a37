//! Discovery of ESPurna devices via mDNS/DNS-SD
pub mod discover;
pub mod util;

pub use discover::discover_devices;
