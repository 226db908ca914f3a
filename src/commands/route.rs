//! `lite-env route add|remove <env>` — route the container network through
//! the environment's director.

use anyhow::Result;
use colored::Colorize;
use std::process::Command;

use crate::config::Config;
use crate::domain::environment::{EnvName, EnvStore};
use crate::domain::network::DirectorNetwork;
use crate::platform::{self, RouteAction};
use crate::tools;

pub fn run(cfg: &Config, action: RouteAction, name: &EnvName) -> Result<()> {
    EnvStore::new(&cfg.state_dir).env(name).ensure_exists()?;

    let os = platform::detect()?;
    let gateway = DirectorNetwork::for_env(name.as_str()).director_ip().to_string();
    let route = platform::route_command(os, action, &cfg.container_cidr, &gateway);

    println!(
        "{} Running: sudo {}",
        ">>".blue().bold(),
        route.join(" ")
    );

    tools::run_status(Command::new("sudo").args(&route), "sudo route")?;

    println!(
        "{} Route {} {} via {}",
        "ok".green().bold(),
        match action {
            RouteAction::Add => "added:",
            RouteAction::Remove => "removed:",
        },
        cfg.container_cidr,
        gateway
    );
    Ok(())
}
