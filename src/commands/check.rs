use anyhow::Result;
use colored::Colorize;

use crate::bosh::BoshCli;
use crate::config::{self, Config};
use crate::domain::environment::EnvStore;
use crate::platform;

pub fn run(cfg: &Config, required_version: Option<semver::VersionReq>) -> Result<()> {
    let os = platform::detect()?;

    println!("{}", "lite-env check".bold());
    println!("  platform:   {}", format!("{:?}", os).to_lowercase());
    println!("  config:     {}", config::Config::path()?.display());
    println!("  state:      {}", cfg.state_dir.display());
    println!(
        "  bosh.yml:   {}",
        if cfg.deployment_dir.join("bosh.yml").is_file() {
            cfg.deployment_dir.display().to_string().normal()
        } else {
            format!("{} (missing)", cfg.deployment_dir.display()).yellow()
        }
    );
    println!("  envs:       {}", EnvStore::new(&cfg.state_dir).list()?.len());

    let bosh = match BoshCli::locate(cfg) {
        Ok(bosh) => bosh,
        Err(_) => {
            println!("  bosh:       {}", "not installed".red());
            println!("  hint:       install the BOSH CLI or set `bosh_cli` in the config");
            std::process::exit(1);
        }
    };

    println!("  bosh:       {}", "installed".green());
    println!("  path:       {}", bosh.path().display());

    let Some(version) = bosh.version() else {
        println!("  version:    {}", "unknown".yellow());
        if required_version.is_some() {
            std::process::exit(1);
        }
        return Ok(());
    };
    println!("  version:    {}", version);

    if let Some(req) = required_version {
        if !req.matches(&version) {
            println!(
                "{} bosh {} installed but {} required",
                "!!".yellow().bold(),
                version,
                req
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
