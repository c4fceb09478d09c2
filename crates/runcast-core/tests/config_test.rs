use std::path::Path;

use runcast_core::{
    BuildMode, ExecutionEnvironment, Ingress, ManifestKind, Profile, RuncastConfig, VpcEgress,
};
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = RuncastConfig::load(tmp.path()).unwrap();

    assert!(config.target.name.is_none());
    assert_eq!(config.target.root, Path::new("."));
    assert!(config.target.output_path.is_none());
    assert_eq!(config.deploy.profile, Profile::MultiContainer);
    assert!(config.deploy.name.is_none());
    assert!(config.deploy.project.is_none());
    assert!(config.deploy.allow_unauthenticated.is_none());
    assert!(config.deploy.tag_with_version.is_none());
    assert!(config.deploy.sidecars.is_empty());
    assert!(config.deploy.container.env.is_empty());
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[target]
name = "api"
root = "apps/api"
output_path = "dist/apps/api"

[deploy]
name = "api-svc"
project = "my-gcp-project"
region = "europe-west1"
dockerfile = "apps/api/Dockerfile"
min_instances = 1
max_instances = 20
concurrency = 40
ingress = "internal-and-cloud-load-balancing"
vpc_connector = "conn-1"
vpc_egress = "private-ranges-only"
execution_environment = "gen2"
timeout = "300s"
cpu_boost = true
no_traffic = true
revision_suffix = "canary"
service_account = "api@my-gcp-project.iam.gserviceaccount.com"
allow_unauthenticated = false
cloud_sql_instance = "my-gcp-project:europe-west1:db"
volume = "cache,type=in-memory"
tag_with_version = "node"
container_name = "app"
image = "europe-docker.pkg.dev/p/r/api:1"
port = 3000
cpu = "2"
memory = "1Gi"
args = ["--serve"]
secrets = ["DB_PASS=db-pass:latest"]
volume_mount = { volume = "cache", mount_path = "/cache" }

[deploy.env]
RUST_LOG = "info"

[deploy.labels]
team = "core"

[[deploy.sidecars]]
name = "collector"
image = "otel/opentelemetry-collector:latest"
memory = "256Mi"
depends_on = ["app"]

[[deploy.sidecars]]
name = "proxy"
image = "envoyproxy/envoy:v1.30"
"#;
    std::fs::write(tmp.path().join("runcast.toml"), toml).unwrap();

    let config = RuncastConfig::load(tmp.path()).unwrap();
    let target = &config.target;
    let deploy = &config.deploy;

    assert_eq!(target.name.as_deref(), Some("api"));
    assert_eq!(target.root, Path::new("apps/api"));
    assert_eq!(target.output_path.as_deref(), Some(Path::new("dist/apps/api")));

    assert_eq!(deploy.name.as_deref(), Some("api-svc"));
    assert_eq!(deploy.project.as_deref(), Some("my-gcp-project"));
    assert_eq!(deploy.region.as_deref(), Some("europe-west1"));
    assert_eq!(deploy.min_instances, Some(1));
    assert_eq!(deploy.max_instances, Some(20));
    assert_eq!(deploy.concurrency, Some(40));
    assert_eq!(deploy.ingress, Some(Ingress::InternalAndCloudLoadBalancing));
    assert_eq!(deploy.vpc_egress, Some(VpcEgress::PrivateRangesOnly));
    assert_eq!(
        deploy.execution_environment,
        Some(ExecutionEnvironment::Gen2)
    );
    assert_eq!(deploy.cpu_boost, Some(true));
    assert_eq!(deploy.no_traffic, Some(true));
    assert_eq!(deploy.allow_unauthenticated, Some(false));
    assert_eq!(deploy.volume.as_deref(), Some("cache,type=in-memory"));
    assert_eq!(deploy.tag_with_version, Some(ManifestKind::Node));
    assert_eq!(deploy.labels["team"], "core");

    // Primary container is flattened into [deploy]
    assert_eq!(deploy.container.port, Some(3000));
    assert_eq!(deploy.container.memory.as_deref(), Some("1Gi"));
    assert_eq!(deploy.container.env["RUST_LOG"], "info");
    assert_eq!(deploy.container.secrets, vec!["DB_PASS=db-pass:latest"]);
    let mount = deploy.container.volume_mount.as_ref().unwrap();
    assert_eq!(mount.volume, "cache");
    assert_eq!(mount.mount_path, "/cache");

    // Sidecars keep declaration order
    let names: Vec<_> = deploy.sidecars.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["collector", "proxy"]);
    assert_eq!(deploy.sidecars[0].container.depends_on, vec!["app"]);
    assert_eq!(
        deploy.sidecars[1].container.image.as_deref(),
        Some("envoyproxy/envoy:v1.30")
    );
}

#[test]
fn load_classic_profile() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[deploy]
profile = "classic"
http2 = true
build_with = "container-registry"
"#;
    std::fs::write(tmp.path().join("runcast.toml"), toml).unwrap();

    let config = RuncastConfig::load(tmp.path()).unwrap();

    assert_eq!(config.deploy.profile, Profile::Classic);
    assert_eq!(config.deploy.http2, Some(true));
    assert_eq!(config.deploy.build_with, Some(BuildMode::ContainerRegistry));
}

#[test]
fn vpc_egress_accepts_all_alias() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("runcast.toml"),
        "[deploy]\nvpc_egress = \"all\"\n",
    )
    .unwrap();

    let config = RuncastConfig::load(tmp.path()).unwrap();
    assert_eq!(config.deploy.vpc_egress, Some(VpcEgress::AllTraffic));
}

#[test]
fn load_unknown_profile_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("runcast.toml"),
        "[deploy]\nprofile = \"serverless\"\n",
    )
    .unwrap();

    let err = RuncastConfig::load(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("parse"), "got: {err}");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("runcast.toml"), "not valid {{{{ toml").unwrap();

    let result = RuncastConfig::load(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("runcast.toml"), "").unwrap();

    let config = RuncastConfig::load(tmp.path()).unwrap();
    assert_eq!(config.deploy.profile, Profile::MultiContainer);
    assert_eq!(config.target.root, Path::new("."));
}

#[test]
fn from_file_parses_json() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deploy.json");
    let json = r#"{
  "target": { "name": "web", "output_path": "dist/web" },
  "deploy": {
    "project": "p1",
    "region": "us-central1",
    "tag_with_version": "python",
    "env": { "A": "1" },
    "sidecars": [{ "name": "log", "image": "fluent/fluent-bit" }]
  }
}"#;
    std::fs::write(&path, json).unwrap();

    let config = RuncastConfig::from_file(&path).unwrap();

    assert_eq!(config.target.name.as_deref(), Some("web"));
    assert_eq!(config.deploy.project.as_deref(), Some("p1"));
    assert_eq!(config.deploy.tag_with_version, Some(ManifestKind::Python));
    assert_eq!(config.deploy.container.env["A"], "1");
    assert_eq!(config.deploy.sidecars[0].name, "log");
}

#[test]
fn from_file_invalid_json_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("deploy.json");
    std::fs::write(&path, "{ \"deploy\": ").unwrap();

    let err = RuncastConfig::from_file(&path).unwrap_err().to_string();
    assert!(err.contains("JSON"), "got: {err}");
}

#[test]
fn from_file_missing_returns_load_error() {
    let tmp = TempDir::new().unwrap();
    let err = RuncastConfig::from_file(&tmp.path().join("absent.toml"))
        .unwrap_err()
        .to_string();
    assert!(err.contains("failed to load config"), "got: {err}");
}

// ── Target / name resolution ──

#[test]
fn require_output_path_errors_when_unset() {
    let config = RuncastConfig::default();
    let err = config.target.require_output_path().unwrap_err().to_string();
    assert!(err.contains("output_path"), "got: {err}");
}

#[test]
fn require_output_path_errors_when_empty() {
    let mut config = RuncastConfig::default();
    config.target.output_path = Some("".into());
    assert!(config.target.require_output_path().is_err());
}

#[test]
fn resolved_name_falls_back_to_target() {
    let mut config = RuncastConfig::default();
    assert_eq!(config.deploy.resolved_name(Some("api")), Some("api"));

    config.deploy.name = Some(String::new());
    assert_eq!(config.deploy.resolved_name(Some("api")), Some("api"));

    config.deploy.name = Some("svc".to_owned());
    assert_eq!(config.deploy.resolved_name(Some("api")), Some("svc"));

    config.deploy.name = None;
    assert_eq!(config.deploy.resolved_name(None), None);
    assert_eq!(config.deploy.resolved_name(Some("")), None);
}
