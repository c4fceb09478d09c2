use std::path::Path;

use runcast_build::stage_configured_dockerfile;
use runcast_cloud::{CommandExecutor, CompileContext, DeployPlan, GcloudClient, compile};
use runcast_core::resolve_version_tag;

use super::load_config;

/// Execute the full deploy pipeline.
pub async fn deploy(config_path: Option<&Path>, dry_run: bool) -> anyhow::Result<()> {
    let (config, workspace_root) = load_config(config_path)?;
    let output_dir = config.target.require_output_path()?;

    if !dry_run {
        stage_configured_dockerfile(&workspace_root, &config)?;
    } else if let Some(dockerfile) = &config.deploy.dockerfile {
        tracing::info!(
            dockerfile = %dockerfile.display(),
            "dry run; skipping Dockerfile staging"
        );
    }

    let version_tag = config.deploy.tag_with_version.and_then(|kind| {
        resolve_version_tag(&workspace_root.join(&config.target.root), kind).tag
    });

    let ctx = CompileContext {
        target_name: config.target.name.as_deref(),
        source_dir: Some(output_dir),
        version_tag: version_tag.as_ref(),
    };
    let mut plan = compile(&config.deploy, &ctx)?;
    plan.set_current_dir(&workspace_root);

    if dry_run {
        return run(&GcloudClient::dry_run(), &plan).await;
    }

    run(&GcloudClient::new(), &plan).await?;
    println!();
    println!("Deployed to Cloud Run.");
    Ok(())
}

async fn run<E: CommandExecutor>(client: &GcloudClient<E>, plan: &DeployPlan) -> anyhow::Result<()> {
    for command in plan.commands() {
        tracing::debug!(%command, "planned");
    }
    client.deploy(plan).await?;
    Ok(())
}
