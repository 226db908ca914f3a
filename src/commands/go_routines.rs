//! `lite-env go-routines` — goroutine counts from each process's pprof index.

use anyhow::Result;
use colored::Colorize;

use crate::bosh::{RemoteShell, Target};
use crate::domain::reports::{self, GoroutineSample};

pub fn run(shell: &dyn RemoteShell, target: &Target, format: &str) -> Result<()> {
    let samples = reports::goroutine_report(shell, target)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&samples)?),
        _ => {
            if samples.is_empty() {
                println!("{} No process answered on /debug/pprof/", "::".blue().bold());
            }
            for line in render(&samples) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn render(samples: &[GoroutineSample]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_vm: Option<&str> = None;
    for s in samples {
        if current_vm != Some(s.vm.as_str()) {
            lines.push(format!("{}", s.vm.cyan().bold()));
            current_vm = Some(s.vm.as_str());
        }
        lines.push(format!(
            "  {} {} goroutines {}",
            s.process,
            s.goroutines.to_string().bold(),
            format!("(port {})", s.port).dimmed()
        ));
    }
    lines
}
