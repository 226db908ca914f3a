use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::domain::environment::EnvStore;
use crate::domain::network::DirectorNetwork;

pub fn run(cfg: &Config) -> Result<()> {
    let store = EnvStore::new(&cfg.state_dir);
    let envs = store.list()?;

    if envs.is_empty() {
        println!(
            "{} No environments in {}",
            "::".blue().bold(),
            store.root().display()
        );
        return Ok(());
    }

    println!("{}", "Environments".bold());
    println!();
    for env in &envs {
        let net = DirectorNetwork::for_env(env.name.as_str());
        let state = if env.state_file().exists() {
            "created".green()
        } else {
            "no state".yellow()
        };
        println!(
            "  {} {} {}",
            env.name.to_string().bold(),
            net.director_ip().to_string().dimmed(),
            state
        );
        for ops in env.read_ops_files()? {
            println!("      -o {}", ops);
        }
    }
    println!();
    Ok(())
}
