use crate::compile::DeployPlan;
use crate::executor::{CommandExecutor, DryRunExecutor, RealExecutor};
use crate::gcloud::ExecError;

/// Runs compiled deploy plans, parameterized over the executor for testability.
pub struct GcloudClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl GcloudClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for GcloudClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl GcloudClient<DryRunExecutor> {
    /// A client that prints commands instead of running them.
    pub fn dry_run() -> Self {
        Self {
            executor: DryRunExecutor,
        }
    }
}

impl<E: CommandExecutor> GcloudClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Execute the plan's commands in order, stopping at the first failure.
    ///
    /// A failed process is reported as-is; nothing is retried.
    pub async fn deploy(&self, plan: &DeployPlan) -> Result<(), DeployError> {
        if let Some(build) = &plan.build {
            tracing::info!("submitting image build");
            self.executor
                .exec_streaming(build)
                .await
                .map_err(|e| DeployError::Build { source: e })?;
        }

        tracing::info!("deploying to Cloud Run");
        self.executor
            .exec_streaming(&plan.deploy)
            .await
            .map_err(|e| DeployError::Deploy { source: e })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("container image build failed")]
    Build { source: ExecError },

    #[error("cloud run deployment failed")]
    Deploy { source: ExecError },
}

impl DeployError {
    /// Exit code of the failed gcloud process, to be passed through unchanged.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Build { source } | Self::Deploy { source } => source.exit_code(),
        }
    }
}
