use std::path::{Path, PathBuf};

use runcast_core::RuncastConfig;

/// File name the staged Dockerfile always gets inside the output directory.
pub const STAGED_DOCKERFILE: &str = "Dockerfile";

/// Copies the user's Dockerfile verbatim into the build output directory,
/// where `gcloud run deploy --source` picks it up.
///
/// Returns the path of the staged file. A Dockerfile that already lives at
/// `<output_dir>/Dockerfile` is left untouched.
pub fn stage_dockerfile(dockerfile: &Path, output_dir: &Path) -> Result<PathBuf, StageError> {
    if !output_dir.is_dir() {
        return Err(StageError::OutputDirMissing(output_dir.to_path_buf()));
    }
    if !dockerfile.is_file() {
        return Err(StageError::DockerfileMissing(dockerfile.to_path_buf()));
    }

    let staged = output_dir.join(STAGED_DOCKERFILE);

    if is_same_file(dockerfile, &staged)? {
        tracing::debug!(path = %staged.display(), "Dockerfile already in output directory");
        return Ok(staged);
    }

    std::fs::copy(dockerfile, &staged).map_err(|e| StageError::Copy {
        from: dockerfile.to_path_buf(),
        to: staged.clone(),
        source: e,
    })?;

    tracing::info!(
        from = %dockerfile.display(),
        to = %staged.display(),
        "Dockerfile staged"
    );

    Ok(staged)
}

/// Stages `[deploy].dockerfile`, if any, into `[target].output_path`.
///
/// Both paths are taken relative to `workspace_root`. Returns `None` when no
/// Dockerfile is configured.
pub fn stage_configured_dockerfile(
    workspace_root: &Path,
    config: &RuncastConfig,
) -> Result<Option<PathBuf>, StageError> {
    let Some(dockerfile) = config.deploy.dockerfile.as_deref() else {
        return Ok(None);
    };
    let output_dir = workspace_root.join(config.target.require_output_path()?);
    stage_dockerfile(&workspace_root.join(dockerfile), &output_dir).map(Some)
}

/// `fs::copy` onto itself truncates the file, so detect that case first.
fn is_same_file(a: &Path, b: &Path) -> Result<bool, StageError> {
    if !b.exists() {
        return Ok(false);
    }
    let canonical = |p: &Path| {
        p.canonicalize().map_err(|e| StageError::Resolve {
            path: p.to_path_buf(),
            source: e,
        })
    };
    Ok(canonical(a)? == canonical(b)?)
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Config(#[from] runcast_core::Error),
    #[error("build output directory {0} does not exist — build the target first")]
    OutputDirMissing(PathBuf),
    #[error("Dockerfile not found at {0}")]
    DockerfileMissing(PathBuf),
    #[error("failed to resolve {path}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}
