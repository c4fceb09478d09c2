//! Version tag resolution from project manifests.
//!
//! A revision tag is derived from the version declared in the project's
//! manifest: `1.2.3` becomes `v1-2-3`. Resolution is best effort. Any
//! problem with the manifest downgrades to "no tag" plus a warning, and the
//! deployment proceeds untagged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A `version = "X.Y.Z"` assignment occupying a whole line.
static PYPROJECT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*version[ \t]*=[ \t]*(?:"([^"\r\n]*)"|'([^'\r\n]*)')[ \t]*\r?$"#)
        .expect("pyproject version pattern is a valid regex")
});

/// Which manifest the version is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    /// `package.json`, top-level `version` field
    Node,
    /// `pyproject.toml`, first `version = "..."` line
    Python,
    /// `Cargo.toml`, `[package].version`
    Cargo,
}

impl ManifestKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Node => "package.json",
            Self::Python => "pyproject.toml",
            Self::Cargo => "Cargo.toml",
        }
    }
}

/// A revision tag derived from a manifest version (`v1-2-3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag(String);

impl VersionTag {
    /// Normalize a version string into a tag. Returns `None` for blank input.
    ///
    /// # Examples
    ///
    /// ```
    /// use runcast_core::VersionTag;
    ///
    /// let tag = VersionTag::from_version("1.2.3").unwrap();
    /// assert_eq!(tag.as_str(), "v1-2-3");
    /// assert!(VersionTag::from_version("  ").is_none());
    /// ```
    pub fn from_version(version: &str) -> Option<Self> {
        let version = version.trim();
        if version.is_empty() {
            return None;
        }
        Some(Self(format!("v{}", version.replace('.', "-"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why no tag could be derived. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum ManifestWarning {
    #[error("manifest {path} not found; deploying without a version tag")]
    Missing { path: PathBuf },

    #[error("failed to read manifest {path}; deploying without a version tag")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("manifest {path} could not be parsed ({detail}); deploying without a version tag")]
    Malformed { path: PathBuf, detail: String },

    #[error("no version found in {path}; deploying without a version tag")]
    NoVersion { path: PathBuf },
}

/// Outcome of [`resolve_version_tag`].
#[derive(Debug, Default)]
pub struct ResolvedVersion {
    pub tag: Option<VersionTag>,
    pub warnings: Vec<ManifestWarning>,
}

impl ResolvedVersion {
    fn tagged(tag: VersionTag) -> Self {
        Self {
            tag: Some(tag),
            warnings: Vec::new(),
        }
    }

    fn untagged(warning: ManifestWarning) -> Self {
        tracing::warn!(%warning, "version tag unavailable");
        Self {
            tag: None,
            warnings: vec![warning],
        }
    }
}

/// Read the manifest of `kind` in `project_dir` and derive a version tag.
pub fn resolve_version_tag(project_dir: &Path, kind: ManifestKind) -> ResolvedVersion {
    let path = project_dir.join(kind.file_name());
    tracing::debug!(path = %path.display(), ?kind, "resolving version tag");

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return ResolvedVersion::untagged(ManifestWarning::Missing { path });
        }
        Err(e) => {
            return ResolvedVersion::untagged(ManifestWarning::Unreadable { path, source: e });
        }
    };

    let version = match kind {
        ManifestKind::Node => version_from_package_json(&content),
        ManifestKind::Python => Ok(version_from_pyproject(&content)),
        ManifestKind::Cargo => version_from_cargo_toml(&content),
    };

    match version {
        Ok(Some(v)) => match VersionTag::from_version(&v) {
            Some(tag) => {
                tracing::debug!(version = %v, %tag, "version tag resolved");
                ResolvedVersion::tagged(tag)
            }
            None => ResolvedVersion::untagged(ManifestWarning::NoVersion { path }),
        },
        Ok(None) => ResolvedVersion::untagged(ManifestWarning::NoVersion { path }),
        Err(detail) => ResolvedVersion::untagged(ManifestWarning::Malformed { path, detail }),
    }
}

/// Top-level string `version` of a `package.json` document.
fn version_from_package_json(content: &str) -> Result<Option<String>, String> {
    let doc: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    Ok(doc
        .get("version")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned))
}

fn version_from_pyproject(content: &str) -> Option<String> {
    PYPROJECT_VERSION.captures(content).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_owned())
    })
}

/// `[package].version`; `version.workspace = true` yields `None`.
fn version_from_cargo_toml(content: &str) -> Result<Option<String>, String> {
    let doc: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(doc
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(toml::Value::as_str)
        .map(str::to_owned))
}
