use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    MacOS,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Add,
    Remove,
}

impl FromStr for RouteAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(RouteAction::Add),
            "remove" | "delete" | "del" => Ok(RouteAction::Remove),
            other => bail!("unknown route action '{}' (expected 'add' or 'remove')", other),
        }
    }
}

impl fmt::Display for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteAction::Add => write!(f, "add"),
            RouteAction::Remove => write!(f, "remove"),
        }
    }
}

pub fn detect() -> Result<Os> {
    match std::env::consts::OS {
        "macos" => Ok(Os::MacOS),
        "linux" => Ok(Os::Linux),
        other => bail!("unsupported OS: {}", other),
    }
}

/// Host command (run through sudo) that adds or removes the route sending
/// `cidr` to `gateway`.
pub fn route_command(os: Os, action: RouteAction, cidr: &str, gateway: &str) -> Vec<String> {
    let words: Vec<&str> = match (os, action) {
        (Os::Linux, RouteAction::Add) => vec!["ip", "route", "add", cidr, "via", gateway],
        (Os::Linux, RouteAction::Remove) => vec!["ip", "route", "del", cidr, "via", gateway],
        (Os::MacOS, RouteAction::Add) => vec!["route", "-n", "add", "-net", cidr, gateway],
        (Os::MacOS, RouteAction::Remove) => vec!["route", "-n", "delete", "-net", cidr, gateway],
    };
    words.into_iter().map(str::to_string).collect()
}
