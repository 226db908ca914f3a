//! `lite-env create-env <env>` — bring up a BOSH Lite director.

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::warn;

use crate::bosh::BoshCli;
use crate::config::Config;
use crate::domain::environment::{EnvName, EnvStore};
use crate::domain::network::DirectorNetwork;

pub fn run(cfg: &Config, bosh: &BoshCli, name: &EnvName, extra_ops: &[String]) -> Result<()> {
    let env = EnvStore::new(&cfg.state_dir).env(name);
    let net = DirectorNetwork::for_env(name.as_str());
    let director_ip = net.director_ip().to_string();

    let ops_files: Vec<String> = cfg.ops_files.iter().chain(extra_ops).cloned().collect();

    env.create()?;
    println!(
        "{} Creating environment {} (director {})...",
        "::".blue().bold(),
        name.to_string().bold(),
        director_ip
    );

    let created = env
        .write_ops_files(&ops_files)
        .and_then(|_| bosh.create_env(cfg, &env, &ops_files));
    if let Err(e) = created {
        if let Err(cleanup) = env.remove() {
            warn!(error = %cleanup, env = %name, "failed to remove state after failed create");
        }
        return Err(e.context(format!("creating environment '{}'", name)));
    }

    let ca = bosh.interpolate(&env.creds_file(), "/director_ssl/ca")?;
    let ca_path = env.ca_cert_file();
    std::fs::write(&ca_path, ca).with_context(|| format!("writing {}", ca_path.display()))?;
    bosh.alias_env(&env, &director_ip)?;

    println!(
        "{} Environment {} ready at {}",
        "ok".green().bold(),
        name.to_string().bold(),
        director_ip
    );
    println!(
        "   Route container traffic with `lite-env route add {}`",
        name
    );
    println!(
        "   Admin password: `lite-env creds {} /admin_password`",
        name
    );
    Ok(())
}
