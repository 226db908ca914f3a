use anyhow::Result;
use colored::Colorize;

use crate::bosh::{RemoteShell, Target};
use crate::domain::reports;

pub fn run(shell: &dyn RemoteShell, target: &Target, pid: u32) -> Result<()> {
    let ports = reports::ports_of(shell, target, &pid.to_string())?;

    if ports.is_empty() {
        println!("{} pid {} is not listening on any TCP port", "::".blue().bold(), pid);
        return Ok(());
    }
    for port in ports {
        println!("{}", port);
    }
    Ok(())
}
