use anyhow::Result;
use espurna_ota::config::Config;

fn main() -> Result<()> {
    let cfg = Config::init()?;

    log::trace!("{cfg:?}");

    espurna_ota::run::run(&cfg)
}
