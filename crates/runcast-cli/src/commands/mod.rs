mod deploy;
mod init;
mod tag;

use std::path::{Path, PathBuf};

use runcast_core::RuncastConfig;

pub use deploy::deploy;
pub use init::init_project;
pub use tag::tag;

/// Load the config and return it with the workspace root, which is the
/// directory holding the config file.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<(RuncastConfig, PathBuf)> {
    match path {
        Some(path) => {
            let config = RuncastConfig::from_file(path)?;
            let root = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            Ok((config, root))
        }
        None => {
            let root = PathBuf::from(".");
            Ok((RuncastConfig::load(&root)?, root))
        }
    }
}
