use std::process::Stdio;

use crate::command::CommandLine;
use crate::gcloud::ExecError;

/// Abstraction over command execution for testability.
///
/// Production code uses [`RealExecutor`] or [`DryRunExecutor`], tests use
/// mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Run a command, streaming its output to the terminal.
    async fn exec_streaming(&self, command: &CommandLine) -> Result<(), ExecError>;
}

/// Spawns the command as a child process.
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    async fn exec_streaming(&self, command: &CommandLine) -> Result<(), ExecError> {
        tracing::info!(%command, "executing");

        let mut process = tokio::process::Command::new(command.program());
        process
            .args(command.args())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = command.current_dir() {
            process.current_dir(dir);
        }

        let status = process.status().await.map_err(|e| {
            let program = command.program().to_owned();
            if e.kind() == std::io::ErrorKind::NotFound {
                ExecError::NotFound { program, source: e }
            } else {
                ExecError::Spawn { program, source: e }
            }
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Failed {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}

/// Prints each command to stdout instead of running it.
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    async fn exec_streaming(&self, command: &CommandLine) -> Result<(), ExecError> {
        tracing::info!("dry run; not executing");
        println!("{command}");
        Ok(())
    }
}
