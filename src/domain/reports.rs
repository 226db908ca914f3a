//! Read-only reports assembled from remote shell queries.
//!
//! Every query is one blocking `bosh ssh` round trip; the nested
//! VM × process × port loop of the goroutine report runs them one by one.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::ports::{listening_ports, lsof_command};
use super::process_status::{parse_report, VmProcessReport};
use super::remote_output::RemoteOutput;
use super::runtime_metrics::{goroutine_count, pprof_command};
use crate::bosh::{RemoteShell, Target};

pub const MONIT_STATUS: &str = "sudo /var/vcap/bosh/bin/monit status";

/// Goroutine count of one process, read from the first port that answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoroutineSample {
    pub vm: String,
    pub process: String,
    pub port: String,
    pub goroutines: u64,
}

pub fn run_command(shell: &dyn RemoteShell, target: &Target, command: &str) -> Result<RemoteOutput> {
    shell.ssh(target, command)
}

pub fn process_status(shell: &dyn RemoteShell, target: &Target) -> Result<VmProcessReport> {
    let output = shell.ssh(target, MONIT_STATUS)?;
    Ok(parse_report(&output.stdout))
}

/// Ports `pid` listens on; `target` should name a single instance.
pub fn ports_of(shell: &dyn RemoteShell, target: &Target, pid: &str) -> Result<Vec<String>> {
    let output = shell.ssh(target, &lsof_command(pid))?;
    Ok(listening_ports(&output.stdout))
}

pub fn goroutines_on(shell: &dyn RemoteShell, target: &Target, port: &str) -> Result<Option<u64>> {
    let output = shell.ssh(target, &pprof_command(port))?;
    Ok(goroutine_count(&output.stdout))
}

/// One sample per process that serves a pprof index on any of its ports.
///
/// Ports are tried in the order lsof listed them and the search stops at the
/// first port that answers, so later ports of that process are never asked.
pub fn goroutine_report(shell: &dyn RemoteShell, target: &Target) -> Result<Vec<GoroutineSample>> {
    let status = process_status(shell, target)?;
    let mut samples = Vec::new();

    for (vm, processes) in &status {
        let instance = target.instance(vm);
        for process in processes {
            let Some(pid) = process.pid.as_deref() else {
                debug!(vm = %vm, process = %process.name, "no pid, skipping");
                continue;
            };
            for port in ports_of(shell, &instance, pid)? {
                if let Some(goroutines) = goroutines_on(shell, &instance, &port)? {
                    samples.push(GoroutineSample {
                        vm: vm.clone(),
                        process: process.name.clone(),
                        port,
                        goroutines,
                    });
                    break;
                }
            }
        }
    }

    Ok(samples)
}
