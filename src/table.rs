use std::fmt;

use crate::device::Device;

const RULE_WIDTH: usize = 146;

macro_rules! row {
    ($out:expr, $($col:expr),+ $(,)?) => {
        writeln!(
            $out,
            "{:>3}  {:<25}{:<25}{:<15}{:<15}{:<30}{:<10}{:<10}{:<10}",
            $($col),+
        )
    };
}

/// The device list as a fixed-width table with a 1-based index column
#[derive(Debug, Clone, Copy)]
pub struct DeviceTable<'d>(pub &'d [Device]);

impl fmt::Display for DeviceTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        row!(
            f,
            "#",
            "HOSTNAME",
            "IP",
            "APP",
            "VERSION",
            "DEVICE",
            "MEM_SIZE",
            "SDK_SIZE",
            "FREE_SPACE"
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for (idx, d) in self.0.iter().enumerate() {
            row!(
                f,
                idx + 1,
                d.hostname,
                d.ip,
                d.app,
                d.version,
                d.board,
                d.mem_size.as_deref().unwrap_or_default(),
                d.sdk_size.as_deref().unwrap_or_default(),
                d.free_space.as_deref().unwrap_or_default(),
            )?;
        }
        writeln!(f)
    }
}
