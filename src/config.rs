use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ops files applied to every new environment, relative to `deployment_dir`.
pub const DEFAULT_OPS_FILES: &[&str] = &[
    "virtualbox/cpi.yml",
    "virtualbox/outbound-network.yml",
    "bosh-lite.yml",
    "bosh-lite-runc.yml",
    "uaa.yml",
    "credhub.yml",
    "jumpbox-user.yml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name or path of the BOSH CLI.
    pub bosh_cli: String,
    /// Directory holding one sub-directory per environment.
    pub state_dir: PathBuf,
    /// Checkout of cloudfoundry/bosh-deployment.
    pub deployment_dir: PathBuf,
    pub ops_files: Vec<String>,
    /// Container network routed through the director.
    pub container_cidr: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            bosh_cli: "bosh".to_string(),
            state_dir: home.join(".lite-env").join("environments"),
            deployment_dir: home.join("workspace").join("bosh-deployment"),
            ops_files: DEFAULT_OPS_FILES.iter().map(|s| s.to_string()).collect(),
            container_cidr: "10.244.0.0/16".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// `LITE_ENV_CONFIG` if set, else `<config dir>/lite-env/config.yaml`.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os("LITE_ENV_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("lite-env").join("config.yaml"))
    }
}

/// Defaults, then the YAML file, then `LITE_ENV_*` variables.
pub fn load() -> Result<Config> {
    let path = Config::path()?;
    figment(&path)
        .extract()
        .with_context(|| format!("loading configuration ({})", path.display()))
}

fn figment(path: &std::path::Path) -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed("LITE_ENV_").ignore(&["config"]))
}
