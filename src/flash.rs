//! Building and uploading firmware with PlatformIO
use anyhow::{bail, Context, Result};
use std::{
    io::{BufRead, Write},
    process::Command,
};

use crate::{board::FlashTarget, console::Console};

pub const ENV_IP: &str = "ESPURNA_IP";
pub const ENV_BOARD: &str = "ESPURNA_BOARD";
pub const ENV_AUTH: &str = "ESPURNA_AUTH";
pub const ENV_FLAGS: &str = "ESPURNA_FLAGS";

/// Build flag selecting the core (minimal) firmware
pub const CORE_FLAG: &str = "-DESPURNA_CORE";

/// PlatformIO environment for an OTA upload to a board with `size_mb` MiB of flash
pub fn environment_name(size_mb: u32) -> String {
    format!("esp8266-{size_mb}m-ota")
}

/// Prefix `flags` with the core build flag
pub fn with_core_flag(flags: &str) -> String {
    format!("{CORE_FLAG} {flags}")
}

/// Something that builds and uploads firmware to a target
pub trait FlashRunner {
    fn flash(&mut self, target: &FlashTarget, env: &str) -> Result<()>;
}

/// Runs `platformio run --silent --environment <env> -t upload`, passing the target through
/// environment variables read by the ESPurna build scripts
#[derive(Debug, Clone)]
pub struct PlatformIo {
    program: String,
}

impl PlatformIo {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, target: &FlashTarget, env: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["run", "--silent", "--environment", env, "-t", "upload"])
            .env(ENV_IP, &target.board.ip)
            .env(ENV_BOARD, &target.board.board)
            .env(ENV_AUTH, &target.auth)
            .env(ENV_FLAGS, &target.flags);
        cmd
    }
}

impl FlashRunner for PlatformIo {
    fn flash(&mut self, target: &FlashTarget, env: &str) -> Result<()> {
        let mut cmd = self.command(target, env);
        log::debug!("Executing: {cmd:?}");
        let status = cmd
            .status()
            .with_context(|| format!("Failed to start {}", self.program))?;
        if !status.success() {
            bail!("{} failed flashing {}: {status}", self.program, target.host());
        }
        log::info!("Flashed {} ({env})", target.host());
        Ok(())
    }
}

/// Print the summary for `target`, ask for confirmation and flash it on an exact `y`.
///
/// Returns whether the target was flashed. A failing flash is returned as an error.
pub fn confirm_and_flash<R, W, F>(
    console: &mut Console<R, W>,
    target: &FlashTarget,
    runner: &mut F,
) -> Result<bool>
where
    R: BufRead,
    W: Write,
    F: FlashRunner + ?Sized,
{
    let env = environment_name(target.board.size_mb);

    writeln!(console)?;
    writeln!(console, "HOST  = {}", target.host())?;
    writeln!(console, "IP    = {}", target.board.ip)?;
    writeln!(console, "BOARD = {}", target.board.board)?;
    writeln!(console, "AUTH  = {}", target.auth)?;
    writeln!(console, "FLAGS = {}", target.flags)?;
    writeln!(console, "ENV   = {env}")?;

    let response = console.ask("\nAre these values right [y/N]: ")?;
    writeln!(console)?;
    if response.as_deref() != Some("y") {
        log::info!("Skipping {}", target.host());
        return Ok(false);
    }

    writeln!(console, "Building and flashing image over-the-air...")?;
    console.flush()?;
    runner.flash(target, &env)?;
    Ok(true)
}
