use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::errors::LiteEnvError;

/// Resolve a tool given by name or path. Names are searched on PATH, then
/// in the usual install locations of the BOSH CLI.
pub fn find(name: &str) -> Option<PathBuf> {
    if name.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(name);
        return p.is_file().then_some(p);
    }

    // Check PATH first
    if let Some(p) = find_in_path(name) {
        return Some(p);
    }

    let well_known = ["/usr/local/bin", "/opt/homebrew/bin"];
    for dir in &well_known {
        let p = PathBuf::from(dir).join(name);
        if p.is_file() {
            return Some(p);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let p = home.join("bin").join(name);
        if p.is_file() {
            return Some(p);
        }
    }

    None
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Run with inherited stdio and fail with the child's exit code.
pub fn run_status(cmd: &mut Command, what: &str) -> Result<()> {
    debug!(command = ?cmd, "running");
    let status = cmd
        .status()
        .with_context(|| format!("failed to run {}", what))?;
    if status.success() {
        return Ok(());
    }
    Err(LiteEnvError::CommandFailed {
        program: what.to_string(),
        // killed by a signal: no code, report a generic failure
        code: status.code().unwrap_or(1),
    }
    .into())
}

/// Run and capture stdout; a non-zero exit is an error carrying the code.
pub fn run_capture(cmd: &mut Command, what: &str) -> Result<String> {
    debug!(command = ?cmd, "capturing");
    let output = cmd
        .output()
        .with_context(|| format!("failed to run {}", what))?;
    if !output.status.success() {
        return Err(LiteEnvError::CommandFailed {
            program: what.to_string(),
            code: output.status.code().unwrap_or(1),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// `path` as is when absolute, otherwise relative to `base`.
pub fn resolve_under(base: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_are_not_searched() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let tool = tmp.path().join("bosh");
        assert_eq!(find(&tool.to_string_lossy()), None);
        std::fs::write(&tool, "").expect("write");
        assert_eq!(find(&tool.to_string_lossy()), Some(tool));
    }

    #[test]
    fn relative_paths_resolve_under_base() {
        let base = Path::new("/work/bosh-deployment");
        assert_eq!(
            resolve_under(base, "virtualbox/cpi.yml"),
            PathBuf::from("/work/bosh-deployment/virtualbox/cpi.yml")
        );
        assert_eq!(resolve_under(base, "/etc/ops.yml"), PathBuf::from("/etc/ops.yml"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_carries_its_exit_code() {
        let err = run_status(Command::new("sh").args(["-c", "exit 4"]), "sh")
            .expect_err("non-zero exit");
        assert_eq!(crate::errors::exit_code(&err), 4);

        let err = run_capture(Command::new("sh").args(["-c", "exit 5"]), "sh")
            .expect_err("non-zero exit");
        assert_eq!(crate::errors::exit_code(&err), 5);
    }

    #[cfg(unix)]
    #[test]
    fn capture_returns_stdout() {
        let out = run_capture(Command::new("sh").args(["-c", "echo hi"]), "sh").expect("runs");
        assert_eq!(out, "hi\n");
    }
}
