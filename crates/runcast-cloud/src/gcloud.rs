#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{program} not found — install: https://cloud.google.com/sdk/docs/install")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to start {program}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("command exited with {}: {command}", describe_code(*code))]
    Failed { command: String, code: Option<i32> },
}

impl ExecError {
    /// Exit code of the failed process, if it ran and exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            Self::NotFound { .. } | Self::Spawn { .. } => None,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_owned(),
    }
}
