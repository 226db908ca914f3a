use anyhow::Result;

use crate::bosh::BoshCli;
use crate::config::Config;
use crate::domain::environment::{EnvName, EnvStore};

pub fn run(cfg: &Config, bosh: &BoshCli, name: &EnvName, path: &str) -> Result<()> {
    let env = EnvStore::new(&cfg.state_dir).env(name);
    env.ensure_exists()?;

    let value = bosh.interpolate(&env.creds_file(), path)?;
    println!("{}", value.trim_end());
    Ok(())
}
