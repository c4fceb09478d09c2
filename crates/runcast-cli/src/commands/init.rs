use std::path::Path;

use runcast_core::RuncastConfig;

const TEMPLATE: &str = r#"[target]
# name = "my-service"
output_path = "dist"
# root = "."

[deploy]
# profile = "multi-container"    # or "classic"
# name = "my-service"            # defaults to [target].name
project = "your-project-id"
region = "us-central1"
# dockerfile = "Dockerfile"      # copied into output_path before deploying
# tag_with_version = "node"      # "node" | "python" | "cargo"

# Scaling
# min_instances = 0
# max_instances = 10
# concurrency = 80

# Networking
# ingress = "all"                # "internal" | "internal-and-cloud-load-balancing"
# vpc_connector = "my-connector"
# vpc_egress = "private-ranges-only"
# allow_unauthenticated = true

# Primary container
# port = 8080
# cpu = "1"
# memory = "512Mi"
# secrets = ["DB_PASSWORD=db-password:latest"]

# [deploy.env]
# RUST_LOG = "info"

# Sidecars (multi-container profile)
# [[deploy.sidecars]]
# name = "collector"
# image = "otel/opentelemetry-collector:latest"
"#;

/// Write a commented runcast.toml template to the current directory.
pub fn init_project() -> anyhow::Result<()> {
    let path = Path::new(RuncastConfig::FILE_NAME);
    if path.exists() {
        eprintln!("{} already exists, skipping", RuncastConfig::FILE_NAME);
        return Ok(());
    }

    std::fs::write(path, TEMPLATE)?;
    println!("Created {}", RuncastConfig::FILE_NAME);
    println!();
    println!("Next steps:");
    println!();
    println!("  1. Set [deploy].project and [target].output_path");
    println!("  2. Preview the command:");
    println!("     runcast deploy --dry-run");
    println!("  3. Deploy:");
    println!("     runcast deploy");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_as_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(RuncastConfig::FILE_NAME);
        std::fs::write(&path, TEMPLATE).unwrap();

        let config = RuncastConfig::from_file(&path).unwrap();
        assert_eq!(config.deploy.project.as_deref(), Some("your-project-id"));
        assert_eq!(config.deploy.region.as_deref(), Some("us-central1"));
        assert!(config.target.require_output_path().is_ok());
    }
}
