//! `lite-env proc-status` — monit processes per VM.

use anyhow::Result;
use colored::{ColoredString, Colorize};

use crate::bosh::{RemoteShell, Target};
use crate::domain::process_status::VmProcessReport;
use crate::domain::reports;

pub fn run(shell: &dyn RemoteShell, target: &Target, format: &str) -> Result<()> {
    let report = reports::process_status(shell, target)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            for line in render(&report) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn render(report: &VmProcessReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (vm, processes) in report {
        lines.push(format!("{}", vm.cyan().bold()));
        if processes.is_empty() {
            lines.push(format!("  {}", "no processes".dimmed()));
            continue;
        }
        let width = processes.iter().map(|p| p.name.chars().count()).max().unwrap_or(0);
        for p in processes {
            let mut line = format!(
                "  {:<width$}  CPU {}  MEM {}",
                p.name,
                percent(p.cpu_percent.as_deref()),
                percent(p.mem_percent.as_deref()),
            );
            if let Some(pid) = &p.pid {
                line.push_str(&format!("  {}", format!("pid {}", pid).dimmed()));
            }
            lines.push(line);
        }
    }
    lines
}

fn percent(value: Option<&str>) -> ColoredString {
    let Some(value) = value else {
        return format!("{:>6}", "-").dimmed();
    };
    let text = format!("{:>5}%", value);
    match value.parse::<f64>() {
        Ok(pct) if pct > 90.0 => text.red(),
        Ok(pct) if pct > 75.0 => text.yellow(),
        _ => text.normal(),
    }
}
