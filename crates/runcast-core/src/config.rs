use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::manifest::ManifestKind;

/// runcast.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuncastConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub deploy: DeploymentConfig,
}

/// The build target being deployed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Project identifier, used when `[deploy].name` is unset
    pub name: Option<String>,
    /// Project root holding the version manifest (defaults to ".")
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Build output directory, relative to the config file
    pub output_path: Option<PathBuf>,
}

/// Everything `gcloud run deploy` is compiled from.
///
/// The primary container's shape is flattened into this table, so
/// `image`, `port`, `env` and friends sit next to the service-level keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Flag table used to compile the command
    #[serde(default)]
    pub profile: Profile,
    /// Cloud Run service name (defaults to `[target].name`)
    pub name: Option<String>,
    /// GCP project ID
    pub project: Option<String>,
    /// GCP region
    pub region: Option<String>,
    /// Dockerfile copied into the output directory before deploying
    pub dockerfile: Option<PathBuf>,

    pub min_instances: Option<u32>,
    pub max_instances: Option<u32>,
    /// Max concurrent requests per instance
    pub concurrency: Option<u32>,

    pub ingress: Option<Ingress>,
    pub vpc_connector: Option<String>,
    pub vpc_egress: Option<VpcEgress>,

    pub execution_environment: Option<ExecutionEnvironment>,
    /// Request timeout, e.g. "300s" or "5m"
    pub timeout: Option<String>,
    pub cpu_boost: Option<bool>,
    /// Deploy the revision without routing traffic to it
    pub no_traffic: Option<bool>,
    pub revision_suffix: Option<String>,

    pub service_account: Option<String>,
    /// Public access; `None` means allowed
    pub allow_unauthenticated: Option<bool>,

    /// Cloud SQL connection name (`project:region:instance`)
    pub cloud_sql_instance: Option<String>,
    /// Volume descriptor; switches the command to the beta surface
    pub volume: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Tag the revision with the version found in this manifest
    pub tag_with_version: Option<ManifestKind>,

    /// Container identifier for the primary container when sidecars exist
    pub container_name: Option<String>,

    // ── classic profile ──
    pub http2: Option<bool>,
    pub build_with: Option<BuildMode>,

    #[serde(flatten)]
    pub container: ContainerSpec,

    #[serde(default)]
    pub sidecars: Vec<SidecarSpec>,
}

/// Runtime shape of a single container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: Option<String>,
    pub port: Option<u16>,
    /// CPU limit, e.g. "1" or "500m"
    pub cpu: Option<String>,
    /// Memory limit, e.g. "512Mi"
    pub memory: Option<String>,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Secret references in `NAME=SECRET:VERSION` form
    #[serde(default)]
    pub secrets: Vec<String>,
    pub volume_mount: Option<VolumeMount>,
    /// Containers that must start before this one
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A named container deployed next to the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidecarSpec {
    pub name: String,
    #[serde(flatten)]
    pub container: ContainerSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub volume: String,
    pub mount_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Sidecars and volumes
    #[default]
    MultiContainer,
    /// Single container with HTTP/2 and registry build modes
    Classic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ingress {
    All,
    Internal,
    InternalAndCloudLoadBalancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VpcEgress {
    #[serde(alias = "all")]
    AllTraffic,
    PrivateRangesOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionEnvironment {
    Gen1,
    Gen2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMode {
    /// `gcloud run deploy --source`, built into Artifact Registry
    #[default]
    ArtifactRegistry,
    /// `gcloud builds submit --tag gcr.io/...` first, then `--image`
    ContainerRegistry,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultiContainer => "multi-container",
            Self::Classic => "classic",
        }
    }
}

impl Ingress {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Internal => "internal",
            Self::InternalAndCloudLoadBalancing => "internal-and-cloud-load-balancing",
        }
    }
}

impl VpcEgress {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllTraffic => "all-traffic",
            Self::PrivateRangesOnly => "private-ranges-only",
        }
    }
}

impl ExecutionEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gen1 => "gen1",
            Self::Gen2 => "gen2",
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            name: None,
            root: default_root(),
            output_path: None,
        }
    }
}

impl TargetConfig {
    /// The configured build output directory.
    ///
    /// # Errors
    ///
    /// [`Error::MissingOutputPath`](crate::Error::MissingOutputPath) when
    /// `output_path` is unset or empty.
    pub fn require_output_path(&self) -> crate::Result<&Path> {
        match self.output_path.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => Ok(path),
            _ => Err(crate::Error::MissingOutputPath {
                target: self.name.clone().unwrap_or_else(|| "<unnamed>".to_owned()),
            }),
        }
    }
}

impl DeploymentConfig {
    /// Deployment name, falling back to the target name. Empty strings count as unset.
    pub fn resolved_name<'a>(&'a self, target_name: Option<&'a str>) -> Option<&'a str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(target_name.filter(|n| !n.is_empty()))
    }

    pub fn has_sidecars(&self) -> bool {
        !self.sidecars.is_empty()
    }
}

impl RuncastConfig {
    pub const FILE_NAME: &'static str = "runcast.toml";

    /// Load from runcast.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);
        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Load an explicit config file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&content).map_err(|e| crate::Error::ConfigParseJson {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?
        };

        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
