//! Listening ports of one process, from `lsof` output.

use once_cell::sync::Lazy;
use regex::Regex;

use super::remote_output::OutputByVm;

static LISTEN_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[:\s])(\d+)\s*\(LISTEN\)").expect("valid listen port regex")
});

/// Remote command listing the TCP sockets `pid` listens on.
pub fn lsof_command(pid: &str) -> String {
    format!("sudo lsof -nP -a -p {pid} -iTCP -sTCP:LISTEN")
}

/// Port in front of the `(LISTEN)` marker, e.g. `TCP *:8080 (LISTEN)`.
pub fn listen_port(line: &str) -> Option<&str> {
    LISTEN_PORT
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Every listening port across all VMs, flattened.
pub fn listening_ports(stdout: &OutputByVm) -> Vec<String> {
    ports_in(stdout.lines())
}

fn ports_in<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    lines
        .into_iter()
        .filter_map(listen_port)
        .map(str::to_string)
        .collect()
}
