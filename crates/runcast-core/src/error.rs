use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse JSON config at {path}")]
    ConfigParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no build output directory for target '{target}' — set [target].output_path")]
    MissingOutputPath { target: String },
}
