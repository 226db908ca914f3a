use thiserror::Error;

/// Failures that decide how the process exits.
#[derive(Debug, Error)]
pub enum LiteEnvError {
    #[error("{0} not found on PATH (set `bosh_cli` in the config or LITE_ENV_BOSH_CLI)")]
    ToolNotFound(String),
    #[error("invalid environment name '{0}' (allowed: letters, digits, '-' and '_', not starting with '-' or '_')")]
    InvalidEnvName(String),
    #[error("environment '{0}' already exists")]
    EnvExists(String),
    #[error("environment '{0}' does not exist")]
    EnvNotFound(String),
    #[error("{program} exited with status {code}")]
    CommandFailed { program: String, code: i32 },
}

impl LiteEnvError {
    /// Exit code the binary should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LiteEnvError::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Map any error bubbling out of a command to a process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LiteEnvError>()
        .map(LiteEnvError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_propagates_its_code() {
        let err = anyhow::Error::new(LiteEnvError::CommandFailed {
            program: "bosh create-env".into(),
            code: 7,
        });
        assert_eq!(exit_code(&err), 7);
    }

    #[test]
    fn context_does_not_hide_the_typed_error() {
        let err = anyhow::Error::new(LiteEnvError::CommandFailed {
            program: "bosh delete-env".into(),
            code: 3,
        })
        .context("deleting environment 'dev'");
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
        let err = anyhow::Error::new(LiteEnvError::EnvExists("dev".into()));
        assert_eq!(exit_code(&err), 1);
    }
}
