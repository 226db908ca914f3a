use anyhow::Result;
use colored::Colorize;

use crate::bosh::BoshCli;
use crate::config::Config;
use crate::domain::environment::{EnvName, EnvStore};

pub fn run(cfg: &Config, bosh: &BoshCli, name: &EnvName) -> Result<()> {
    let env = EnvStore::new(&cfg.state_dir).env(name);
    env.ensure_exists()?;

    // delete-env must see the ops files create-env was given
    let ops_files = env.read_ops_files()?;

    println!(
        "{} Deleting environment {}...",
        "::".blue().bold(),
        name.to_string().bold()
    );

    bosh.delete_env(cfg, &env, &ops_files)?;
    env.remove()?;

    println!("{} Environment {} deleted", "ok".green().bold(), name);
    Ok(())
}
