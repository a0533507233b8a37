use anyhow::Result;
use std::io::{BufRead, Write};

use crate::{
    board::{self, catalog, FlashTarget},
    config::{Config, FlashOptions, SERVICE_TYPE},
    console::{self, Console},
    device::{self, Device},
    flash::{self, FlashRunner, PlatformIo},
    interactive, mdns, table,
};

pub const DESCRIPTION: &str = concat!("ESPurna OTA Manager v", env!("CARGO_PKG_VERSION"));

pub fn run(cfg: &Config) -> Result<()> {
    if let Some(shell) = cfg.completions {
        Config::generate_completions(shell);
        return Ok(());
    }

    let mut console = console::stdio();
    writeln!(console, "\n{DESCRIPTION}\n")?;

    let devices = mdns::discover_devices(SERVICE_TYPE, cfg.timeout_ms)?;

    let mut runner = PlatformIo::new(&cfg.platformio);
    process_devices(
        &cfg.flash_options(),
        devices,
        &mut console,
        || catalog::load_board_types(&cfg.hardware_header),
        &mut runner,
    )
}

/// Everything after discovery: sort and list the devices, then queue and flash boards if requested
pub fn process_devices<R, W, F>(
    opts: &FlashOptions,
    mut devices: Vec<Device>,
    console: &mut Console<R, W>,
    load_board_types: F,
    runner: &mut dyn FlashRunner,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> Result<Vec<String>>,
{
    if devices.is_empty() {
        writeln!(console, "Nothing found!\n")?;
        return Ok(());
    }

    device::sort_devices(&mut devices, &opts.sort)?;
    write!(console, "{}", table::DeviceTable(&devices))?;

    if !opts.flash {
        return Ok(());
    }

    let mut queue = queue_from_hostnames(opts, &devices);
    if queue.is_empty() {
        log::debug!("No board resolved from hostnames, asking the operator");
        if let Some(target) = queue_interactive(opts, &devices, console, load_board_types)? {
            queue.push(target);
        }
    }
    if queue.is_empty() {
        log::info!("No boards to flash");
        return Ok(());
    }

    for mut target in queue {
        if opts.core {
            target.flags = flash::with_core_flag(&target.flags);
        }
        flash::confirm_and_flash(console, &target, &mut *runner)?;
    }
    Ok(())
}

/// Targets for the hostnames given on the command line that can be flashed without prompting
pub fn queue_from_hostnames(opts: &FlashOptions, devices: &[Device]) -> Vec<FlashTarget> {
    opts.hostnames
        .iter()
        .filter_map(|hostname| {
            let found = board::board_by_hostname(devices, hostname);
            if found.is_none() {
                log::warn!("Skipping {hostname}");
            }
            found
        })
        .map(|b| b.into_target(opts.password.clone(), opts.flags.clone()))
        .collect()
}

fn queue_interactive<R, W, F>(
    opts: &FlashOptions,
    devices: &[Device],
    console: &mut Console<R, W>,
    load_board_types: F,
) -> Result<Option<FlashTarget>>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> Result<Vec<String>>,
{
    let Some(board) = interactive::input_board(console, devices, load_board_types)? else {
        return Ok(None);
    };
    let auth = answer_or_ask(console, &opts.password, "Authorization key of the device to flash: ")?;
    let flags = answer_or_ask(console, &opts.flags, "Extra flags for the build: ")?;
    Ok(Some(board.into_target(auth, flags)))
}

/// `given` unless it is empty, in which case the operator is asked
fn answer_or_ask<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    given: &str,
    prompt: &str,
) -> Result<String> {
    if !given.is_empty() {
        return Ok(given.to_owned());
    }
    Ok(console.ask(prompt)?.unwrap_or_default())
}
