use anyhow::Result;
use clap_complete::Shell;

use crate::config::util::*;

pub mod util;

/// Service type advertised by ESPurna devices
pub const SERVICE_TYPE: &str = "_arduino._tcp.local.";

pub const DEFAULT_HARDWARE_HEADER: &str = "espurna/config/hardware.h";
pub const DEFAULT_PLATFORMIO: &str = "platformio";

/// Help output palette
pub fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "ESPurna OTA Manager", version, styles = cli_styles())]
#[command(bin_name = "espurna-ota")]
pub struct Config {
    /// Flash ESPurna core (adds `-DESPURNA_CORE` to the build flags)
    #[arg(short, long, action = ArgAction::Count, default_value_t = 0)]
    pub core: u8,

    /// Flash device(s)
    #[arg(short, long, action = ArgAction::Count, default_value_t = 0)]
    pub flash: u8,

    /// Extra build flags
    #[arg(short('o'), long, default_value_t = String::new())]
    pub flags: String,

    /// Auth password
    #[arg(short, long, default_value_t = String::new(), env = "ESPURNA_AUTH", hide_env_values = true)]
    pub password: String,

    /// Sort devices list by field, e.g. `hostname`, `ip`, `app`, `version`, `device`, `mem_size`
    #[arg(short, long, default_value_t = String::from("hostname"))]
    pub sort: String,

    /// Hostnames to update
    pub hostnames: Vec<String>,

    /// How long in ms to listen for device advertisements
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Header listing the known board types as `defined(BOARD)` macros
    #[arg(long, default_value = DEFAULT_HARDWARE_HEADER)]
    pub hardware_header: PathBuf,

    /// Program used to build and upload the firmware
    #[arg(long, default_value_t = String::from(DEFAULT_PLATFORMIO))]
    pub platformio: String,

    /// Pass many times for more log output
    ///
    /// By default, it'll report errors, warnings and info,
    /// `-v` enables debug messages, `-vv` for trace messages.
    #[arg(short, long, action = ArgAction::Count, default_value_t = 0, global = true)]
    pub verbose: u8,

    /// Silence all log output
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with("verbose"), global = true, env = "ESPURNA_OTA_QUIET")]
    pub quiet: bool,

    /// Generate completion scripts for the specified shell and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Config {
    pub fn init() -> Result<Self> {
        let cfg = Self::parse();

        use stderrlog::LogLevelNum;
        let log_level: LogLevelNum = match cfg.verbose {
            0 => LogLevelNum::Info,
            1 => LogLevelNum::Debug,
            255 => LogLevelNum::Off,
            _ => LogLevelNum::Trace,
        };

        stderrlog::new()
            .verbosity(log_level)
            .quiet(cfg.quiet)
            .init()?;

        Ok(cfg)
    }

    /// The subset of the configuration that drives sorting, selection and flashing
    pub fn flash_options(&self) -> FlashOptions {
        FlashOptions {
            sort: self.sort.clone(),
            flash: self.flash > 0,
            core: self.core > 0,
            flags: self.flags.clone(),
            password: self.password.clone(),
            hostnames: self.hostnames.clone(),
        }
    }

    pub fn generate_completions(shell: Shell) {
        let mut cmd = Self::command();
        let bin_name = cmd.get_bin_name().unwrap_or("espurna-ota").to_owned();
        clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
    }
}

/// Options for everything that happens after discovery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashOptions {
    pub sort: String,
    pub flash: bool,
    pub core: bool,
    pub flags: String,
    pub password: String,
    pub hostnames: Vec<String>,
}
