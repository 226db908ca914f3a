//! On-disk state of one environment.
//!
//! ```text
//! <state_dir>/<env>/
//!   state.json   create-env state, owned by the CLI
//!   creds.yml    vars store, owned by the CLI
//!   ca.crt       director CA extracted from creds.yml
//!   ops-files    ops files applied at creation, one per line
//! ```

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::LiteEnvError;

const OPS_FILES: &str = "ops-files";

/// Validated environment name, safe to use as a directory and alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvName(String);

impl EnvName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EnvName {
    type Err = LiteEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(EnvName(s.to_string()))
        } else {
            Err(LiteEnvError::InvalidEnvName(s.to_string()))
        }
    }
}

impl fmt::Display for EnvName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Root directory holding every environment.
#[derive(Debug, Clone)]
pub struct EnvStore {
    root: PathBuf,
}

impl EnvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env(&self, name: &EnvName) -> EnvDir {
        EnvDir {
            name: name.clone(),
            path: self.root.join(name.as_str()),
        }
    }

    /// Environment directories, sorted by name. Entries that are not valid
    /// environment names are skipped.
    pub fn list(&self) -> Result<Vec<EnvDir>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("reading {}", self.root.display()))?;

        let mut envs = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("reading {}", self.root.display()))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str().and_then(|n| n.parse().ok()) {
                envs.push(self.env(&name));
            }
        }
        envs.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(envs)
    }
}

/// One environment's state directory.
#[derive(Debug, Clone)]
pub struct EnvDir {
    pub name: EnvName,
    pub path: PathBuf,
}

impl EnvDir {
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    pub fn state_file(&self) -> PathBuf {
        self.path.join("state.json")
    }

    pub fn creds_file(&self) -> PathBuf {
        self.path.join("creds.yml")
    }

    pub fn ca_cert_file(&self) -> PathBuf {
        self.path.join("ca.crt")
    }

    fn ops_list_file(&self) -> PathBuf {
        self.path.join(OPS_FILES)
    }

    /// Create the directory; an existing one is an error.
    pub fn create(&self) -> Result<()> {
        if self.exists() {
            return Err(LiteEnvError::EnvExists(self.name.to_string()).into());
        }
        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))
    }

    pub fn remove(&self) -> Result<()> {
        std::fs::remove_dir_all(&self.path)
            .with_context(|| format!("removing {}", self.path.display()))
    }

    pub fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(LiteEnvError::EnvNotFound(self.name.to_string()).into())
        }
    }

    pub fn write_ops_files(&self, ops_files: &[String]) -> Result<()> {
        let path = self.ops_list_file();
        let mut content = ops_files.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
    }

    /// Ops files recorded at creation, in the order they were applied.
    /// A missing list reads as empty.
    pub fn read_ops_files(&self) -> Result<Vec<String>> {
        let path = self.ops_list_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> EnvName {
        s.parse().expect("valid name")
    }

    #[test]
    fn env_names_are_validated() {
        for ok in ["dev", "ci-1", "A_b", "9lives"] {
            assert!(ok.parse::<EnvName>().is_ok(), "{ok}");
        }
        for bad in ["", "-dev", "_dev", "dev/..", "a b", "../x", "dév"] {
            assert!(bad.parse::<EnvName>().is_err(), "{bad}");
        }
    }

    #[test]
    fn ops_file_list_round_trips_in_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = EnvStore::new(tmp.path());
        let env = store.env(&name("dev"));
        env.create().expect("create");

        let ops = vec!["virtualbox/cpi.yml".to_string(), "/abs/extra.yml".to_string()];
        env.write_ops_files(&ops).expect("write");
        assert_eq!(env.read_ops_files().expect("read"), ops);
    }

    #[test]
    fn missing_ops_list_reads_as_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env = EnvStore::new(tmp.path()).env(&name("dev"));
        assert!(env.read_ops_files().expect("read").is_empty());
    }

    #[test]
    fn create_refuses_an_existing_environment() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let env = EnvStore::new(tmp.path()).env(&name("dev"));
        env.create().expect("first create");
        let err = env.create().expect_err("second create");
        assert!(matches!(
            err.downcast_ref::<LiteEnvError>(),
            Some(LiteEnvError::EnvExists(_))
        ));
    }

    #[test]
    fn list_returns_sorted_valid_environments() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = EnvStore::new(tmp.path());
        for n in ["zeta", "alpha"] {
            store.env(&name(n)).create().expect("create");
        }
        std::fs::create_dir(tmp.path().join(".hidden")).expect("mkdir");
        std::fs::write(tmp.path().join("stray-file"), "").expect("write");

        let names: Vec<_> = store
            .list()
            .expect("list")
            .into_iter()
            .map(|e| e.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn list_of_missing_root_is_empty() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = EnvStore::new(tmp.path().join("nope"));
        assert!(store.list().expect("list").is_empty());
    }
}
