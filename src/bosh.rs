//! Invocations of the BOSH CLI.
//!
//! Everything this tool does to a director or its VMs goes through here: the
//! create-env/delete-env lifecycle, aliasing, vars-store lookups and
//! `bosh ssh --command` for the reports.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::environment::EnvDir;
use crate::domain::network::DirectorNetwork;
use crate::domain::remote_output::{aggregate, RemoteOutput};
use crate::errors::LiteEnvError;
use crate::tools;

/// Where a remote command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub environment: String,
    pub deployment: String,
    /// `None` runs on every instance group.
    pub instance_group: Option<String>,
}

impl Target {
    /// `*` or an empty group selects all instance groups.
    pub fn new(environment: &str, deployment: &str, instance_group: &str) -> Self {
        let instance_group = match instance_group.trim() {
            "" | "*" => None,
            group => Some(group.to_string()),
        };
        Self {
            environment: environment.to_string(),
            deployment: deployment.to_string(),
            instance_group,
        }
    }

    /// Same deployment, narrowed to one instance (`group/id`).
    pub fn instance(&self, vm_name: &str) -> Self {
        Self {
            instance_group: Some(vm_name.to_string()),
            ..self.clone()
        }
    }

    pub fn ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = vec![
            "--environment".to_string(),
            self.environment.clone(),
            "--deployment".to_string(),
            self.deployment.clone(),
            "ssh".to_string(),
        ];
        if let Some(group) = &self.instance_group {
            args.push(group.clone());
        }
        args.push("--command".to_string());
        args.push(command.to_string());
        args
    }
}

/// Runs a shell command on the VMs of a deployment.
pub trait RemoteShell {
    fn ssh(&self, target: &Target, command: &str) -> Result<RemoteOutput>;
}

#[derive(Debug, Clone)]
pub struct BoshCli {
    path: PathBuf,
}

impl BoshCli {
    /// Find the configured CLI or fail with [`LiteEnvError::ToolNotFound`].
    pub fn locate(config: &Config) -> Result<Self> {
        let path = tools::find(&config.bosh_cli)
            .ok_or_else(|| LiteEnvError::ToolNotFound(config.bosh_cli.clone()))?;
        debug!(path = %path.display(), "using bosh cli");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.env("BOSH_NON_INTERACTIVE", "true");
        cmd
    }

    /// Version reported by `bosh --version`, if it parses.
    pub fn version(&self) -> Option<semver::Version> {
        let output = self.command().arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        parse_version(&String::from_utf8_lossy(&output.stdout))
    }

    pub fn create_env(&self, config: &Config, env: &EnvDir, ops_files: &[String]) -> Result<()> {
        info!(env = %env.name, ops_files = ops_files.len(), "bosh create-env");
        let mut cmd = self.command();
        cmd.arg("create-env")
            .args(director_args(config, env, ops_files));
        tools::run_status(&mut cmd, "bosh create-env")
    }

    pub fn delete_env(&self, config: &Config, env: &EnvDir, ops_files: &[String]) -> Result<()> {
        info!(env = %env.name, ops_files = ops_files.len(), "bosh delete-env");
        let mut cmd = self.command();
        cmd.arg("delete-env")
            .args(director_args(config, env, ops_files));
        tools::run_status(&mut cmd, "bosh delete-env")
    }

    /// Value at `path` in a YAML file, e.g. `/admin_password` in the vars store.
    pub fn interpolate(&self, file: &Path, path: &str) -> Result<String> {
        let mut cmd = self.command();
        cmd.arg("interpolate").arg(file).args(["--path", path]);
        tools::run_capture(&mut cmd, "bosh interpolate")
    }

    pub fn alias_env(&self, env: &EnvDir, director_ip: &str) -> Result<()> {
        info!(env = %env.name, director_ip, "bosh alias-env");
        let mut cmd = self.command();
        cmd.args(["alias-env", env.name.as_str(), "-e", director_ip, "--ca-cert"])
            .arg(env.ca_cert_file());
        tools::run_status(&mut cmd, "bosh alias-env")
    }
}

impl RemoteShell for BoshCli {
    /// Blocks until `bosh ssh` exits. Its exit status is only logged; callers
    /// get whatever tagged output it printed.
    fn ssh(&self, target: &Target, command: &str) -> Result<RemoteOutput> {
        let mut cmd = self.command();
        cmd.args(target.ssh_args(command));
        debug!(command = ?cmd, "bosh ssh");

        let output = cmd
            .output()
            .with_context(|| format!("failed to run {}", self.path.display()))?;
        let mut raw = String::from_utf8_lossy(&output.stdout).into_owned();
        raw.push('\n');
        raw.push_str(&String::from_utf8_lossy(&output.stderr));
        let remote = aggregate(&raw);
        debug!(
            status = %output.status,
            vms = remote.stdout.len(),
            "bosh ssh finished"
        );
        Ok(remote)
    }
}

/// Arguments shared by `create-env` and `delete-env`.
pub fn director_args(config: &Config, env: &EnvDir, ops_files: &[String]) -> Vec<OsString> {
    let net = DirectorNetwork::for_env(env.name.as_str());
    let mut args: Vec<OsString> = vec![
        config.deployment_dir.join("bosh.yml").into(),
        "--state".into(),
        env.state_file().into(),
        "--vars-store".into(),
        env.creds_file().into(),
    ];
    for ops in ops_files {
        args.push("-o".into());
        args.push(tools::resolve_under(&config.deployment_dir, ops).into());
    }
    let vars = [
        ("director_name", env.name.to_string()),
        ("internal_ip", net.director_ip().to_string()),
        ("internal_gw", net.gateway_ip().to_string()),
        ("internal_cidr", net.cidr()),
        ("outbound_network_name", "NatNetwork".to_string()),
    ];
    for (key, value) in vars {
        args.push("-v".into());
        args.push(format!("{key}={value}").into());
    }
    args
}

fn parse_version(stdout: &str) -> Option<semver::Version> {
    // Format: "version 7.5.6-4fd1a6ff0-2024-02-15T20:23:52Z\n\nSucceeded"
    let token = stdout
        .split_whitespace()
        .skip_while(|w| *w != "version")
        .nth(1)?;
    let core = token.split('-').next()?;
    semver::Version::parse(core).ok()
}
