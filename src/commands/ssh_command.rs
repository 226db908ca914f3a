use anyhow::Result;
use colored::Colorize;

use crate::bosh::{RemoteShell, Target};
use crate::domain::remote_output::RemoteOutput;
use crate::domain::reports;

pub fn run(shell: &dyn RemoteShell, target: &Target, cmd: &str) -> Result<()> {
    let output = reports::run_command(shell, target, cmd)?;
    if output.stdout.is_empty() && output.stderr.is_empty() {
        println!("{} No output from any VM", "::".blue().bold());
        return Ok(());
    }
    for line in render(&output) {
        println!("{}", line);
    }
    Ok(())
}

/// Stdout of every VM, then stderr of every VM.
fn render(output: &RemoteOutput) -> Vec<String> {
    let mut lines = Vec::new();
    for (vm, text) in output.stdout.iter() {
        lines.push(format!("{}", vm.cyan().bold()));
        lines.extend(text.iter().map(|l| format!("  {}", l)));
    }
    for (vm, text) in output.stderr.iter() {
        lines.push(format!("{} {}", vm.cyan().bold(), "stderr".red()));
        lines.extend(text.iter().map(|l| format!("  {}", l.dimmed())));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::remote_output::aggregate;

    #[test]
    fn groups_lines_under_their_vm() {
        colored::control::set_override(false);
        let output = aggregate(
            "Using deployment 'cf'\n\
             api/1: stdout | up 3 days\n\
             api/1: stderr | Unauthorized use is prohibited\n\
             uaa/2: stdout | up 4 days\n",
        );
        assert_eq!(
            render(&output),
            vec![
                "api/1",
                "  up 3 days",
                "uaa/2",
                "  up 4 days",
                "api/1 stderr",
                "  Unauthorized use is prohibited",
            ]
        );
    }
}
