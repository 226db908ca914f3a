mod bosh;
mod commands;
mod config;
mod domain;
mod errors;
mod platform;
mod tools;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::bosh::{BoshCli, Target};
use crate::domain::environment::EnvName;
use crate::platform::RouteAction;

#[derive(Parser)]
#[command(
    name = "lite-env",
    version,
    about = "Manage local BOSH Lite environments and inspect their VMs"
)]
struct Cli {
    /// Log level for diagnostics on stderr (overrides config, RUST_LOG wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit diagnostics as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the BOSH CLI is installed
    Check {
        /// Required CLI version (semver range, e.g. ">=7.0")
        #[arg(long)]
        require: Option<String>,
    },

    /// Create a director VM for a new environment
    CreateEnv {
        env: EnvName,

        /// Extra ops file, applied after the configured ones (repeatable)
        #[arg(short = 'o', long = "ops-file")]
        ops_files: Vec<String>,
    },

    /// Delete an environment's director and its state
    DeleteEnv { env: EnvName },

    /// List environments with their director address
    ListEnvs,

    /// Add or remove the host route to an environment's containers
    Route {
        /// add | remove
        action: RouteAction,
        env: EnvName,
    },

    /// Print a value from an environment's vars store
    Creds {
        env: EnvName,

        /// Path inside creds.yml
        #[arg(default_value = "/admin_password")]
        path: String,
    },

    /// Run a shell command on the VMs of a deployment
    SshCommand {
        env: String,
        deployment: String,
        /// Instance group, `*` for all
        instance_group: String,
        cmd: String,
    },

    /// Show monit processes with CPU and memory usage per VM
    ProcStatus {
        env: String,
        deployment: String,
        /// Instance group, `*` for all
        instance_group: String,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the goroutine count of every Go process exposing pprof
    GoRoutines {
        env: String,
        deployment: String,
        /// Instance group, `*` for all
        instance_group: String,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List the TCP ports a process listens on
    ListenPorts {
        env: String,
        deployment: String,
        /// Instance (`group/id`) or group
        instance: String,
        pid: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "!!".red().bold(), err);
        std::process::exit(errors::exit_code(&err));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load()?;
    init_tracing(cli.log_level.as_deref().unwrap_or(&cfg.log_level), cli.log_json);

    // every command but `check` needs the CLI and fails fast without it
    let locate = || BoshCli::locate(&cfg);

    match cli.command {
        Commands::Check { require } => {
            let version_req = require
                .as_deref()
                .map(|v| v.parse::<semver::VersionReq>())
                .transpose()?;
            commands::check::run(&cfg, version_req)
        }
        Commands::CreateEnv { env, ops_files } => {
            commands::create_env::run(&cfg, &locate()?, &env, &ops_files)
        }
        Commands::DeleteEnv { env } => commands::delete_env::run(&cfg, &locate()?, &env),
        Commands::ListEnvs => {
            locate()?;
            commands::list_envs::run(&cfg)
        }
        Commands::Route { action, env } => {
            locate()?;
            commands::route::run(&cfg, action, &env)
        }
        Commands::Creds { env, path } => commands::creds::run(&cfg, &locate()?, &env, &path),
        Commands::SshCommand {
            env,
            deployment,
            instance_group,
            cmd,
        } => commands::ssh_command::run(
            &locate()?,
            &Target::new(&env, &deployment, &instance_group),
            &cmd,
        ),
        Commands::ProcStatus {
            env,
            deployment,
            instance_group,
            format,
        } => commands::proc_status::run(
            &locate()?,
            &Target::new(&env, &deployment, &instance_group),
            &format,
        ),
        Commands::GoRoutines {
            env,
            deployment,
            instance_group,
            format,
        } => commands::go_routines::run(
            &locate()?,
            &Target::new(&env, &deployment, &instance_group),
            &format,
        ),
        Commands::ListenPorts {
            env,
            deployment,
            instance,
            pid,
        } => commands::listen_ports::run(
            &locate()?,
            &Target::new(&env, &deployment, &instance),
            pid,
        ),
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
