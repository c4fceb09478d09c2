//! Compiles a [`DeploymentConfig`] into `gcloud` command lines.
//!
//! Compilation is pure: no filesystem access, no process execution. The
//! same config and context always yield byte-identical commands.
//!
//! ```text
//! gcloud [beta] run deploy <name>
//!   <service flags>            SERVICE_RULES + profile rules
//!   <primary container flags>  CONTAINER_RULES (--container only with sidecars)
//!   <sidecar flags>...         CONTAINER_RULES, declaration order
//! ```

use std::path::Path;

use runcast_core::{BuildMode, ContainerSpec, DeploymentConfig, Profile, VersionTag};

use crate::command::{CommandLine, FlagValue};
use crate::flags::{self, ContainerInput, ServiceInput};
use crate::secrets::partition_secret_refs;

/// Inputs resolved outside the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileContext<'a> {
    /// Build target name; the deployment name falls back to it
    pub target_name: Option<&'a str>,
    /// Directory passed to `--source` (the build output directory)
    pub source_dir: Option<&'a Path>,
    /// Resolved manifest version tag, if any
    pub version_tag: Option<&'a VersionTag>,
}

/// Commands for one deployment, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    /// Image build submitted before deploying (classic container-registry mode)
    pub build: Option<CommandLine>,
    pub deploy: CommandLine,
    pub warnings: Vec<CompileWarning>,
}

impl DeployPlan {
    pub fn commands(&self) -> impl Iterator<Item = &CommandLine> {
        self.build.iter().chain(std::iter::once(&self.deploy))
    }

    /// Run every command from `dir`.
    pub fn set_current_dir(&mut self, dir: &Path) {
        if let Some(build) = self.build.as_mut() {
            build.set_current_dir(dir);
        }
        self.deploy.set_current_dir(dir);
    }
}

/// Non-fatal problems found while compiling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileWarning {
    #[error("`{field}` is not supported by the {} profile; ignoring it", profile.as_str())]
    UnsupportedField {
        field: &'static str,
        profile: Profile,
    },

    #[error("invalid secret reference {entry:?} on container '{container}'; expected NAME=SECRET:VERSION")]
    InvalidSecret { container: String, entry: String },

    #[error("sidecar #{index} has no name; skipping it")]
    UnnamedSidecar { index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("deployment name is not set — set [deploy].name or [target].name")]
    MissingName,

    #[error("`{0}` is required — set [deploy].{0}")]
    MissingField(&'static str),
}

/// Compile `config` into the commands that deploy it.
///
/// # Errors
///
/// - [`CompileError::MissingName`] if neither the config nor the target names the deployment
/// - [`CompileError::MissingField`] if `project` or `region` is unset
pub fn compile(
    config: &DeploymentConfig,
    ctx: &CompileContext<'_>,
) -> Result<DeployPlan, CompileError> {
    let name = config
        .resolved_name(ctx.target_name)
        .ok_or(CompileError::MissingName)?;
    let project = required(config.project.as_deref(), "project")?;
    let region = required(config.region.as_deref(), "region")?;

    let service = ServiceInput {
        config,
        project,
        region,
        tag: ctx
            .version_tag
            .filter(|_| config.tag_with_version.is_some()),
    };

    let plan = match config.profile {
        Profile::MultiContainer => compile_multi_container(name, &service, ctx),
        Profile::Classic => compile_classic(name, &service, ctx),
    };

    for warning in &plan.warnings {
        tracing::warn!(%warning, "compile warning");
    }
    tracing::debug!(command = %plan.deploy, "deploy command compiled");

    Ok(plan)
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, CompileError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(CompileError::MissingField(field))
}

fn compile_multi_container(
    name: &str,
    service: &ServiceInput<'_>,
    ctx: &CompileContext<'_>,
) -> DeployPlan {
    let config = service.config;
    let profile = Profile::MultiContainer;
    let mut warnings = Vec::new();

    if config.http2.is_some() {
        warnings.push(CompileWarning::UnsupportedField {
            field: "http2",
            profile,
        });
    }
    if config.build_with.is_some() {
        warnings.push(CompileWarning::UnsupportedField {
            field: "build_with",
            profile,
        });
    }

    let mut cmd = CommandLine::gcloud();
    // Volumes are only available on the beta surface.
    if flags::volume_of(config).is_some() {
        cmd.push("beta");
    }
    cmd.push("run").push("deploy").push(name);

    flags::apply_service(flags::SERVICE_RULES, service, &mut cmd);
    flags::apply_service(flags::MULTI_CONTAINER_RULES, service, &mut cmd);

    // Without a name a sidecar's flags would land in the previous group.
    let mut sidecars = Vec::with_capacity(config.sidecars.len());
    for (index, sidecar) in config.sidecars.iter().enumerate() {
        if sidecar.name.is_empty() {
            warnings.push(CompileWarning::UnnamedSidecar { index });
        } else {
            sidecars.push(sidecar);
        }
    }

    // With sidecars every container, the primary included, must be named.
    let primary_id = (!sidecars.is_empty()).then(|| {
        config
            .container_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(name)
    });

    container_group(
        &config.container,
        primary_id,
        image_of(&config.container),
        ctx.source_dir,
        name,
        &mut cmd,
        &mut warnings,
    );

    for sidecar in sidecars {
        container_group(
            &sidecar.container,
            Some(&sidecar.name),
            image_of(&sidecar.container),
            None,
            &sidecar.name,
            &mut cmd,
            &mut warnings,
        );
    }

    DeployPlan {
        build: None,
        deploy: cmd,
        warnings,
    }
}

fn compile_classic(
    name: &str,
    service: &ServiceInput<'_>,
    ctx: &CompileContext<'_>,
) -> DeployPlan {
    let config = service.config;
    let profile = Profile::Classic;
    let mut warnings = Vec::new();
    let mut unsupported = |field| warnings.push(CompileWarning::UnsupportedField { field, profile });

    if config.has_sidecars() {
        unsupported("sidecars");
    }
    if flags::volume_of(config).is_some() {
        unsupported("volume");
    }
    if config.container_name.as_deref().is_some_and(|n| !n.is_empty()) {
        unsupported("container_name");
    }

    let mut primary = config.container.clone();
    if primary.volume_mount.take().is_some() {
        unsupported("volume_mount");
    }
    if !std::mem::take(&mut primary.depends_on).is_empty() {
        unsupported("depends_on");
    }

    let registry_image;
    let mut build = None;
    let image = match (image_of(&primary), config.build_with.unwrap_or_default()) {
        (Some(image), _) => Some(image),
        (None, BuildMode::ArtifactRegistry) => None,
        (None, BuildMode::ContainerRegistry) => {
            registry_image = format!("gcr.io/{}/{name}", service.project);
            build = ctx
                .source_dir
                .map(|dir| build_command(dir, &registry_image, service.project));
            Some(registry_image.as_str())
        }
    };

    let mut cmd = CommandLine::gcloud();
    cmd.push("run").push("deploy").push(name);

    flags::apply_service(flags::SERVICE_RULES, service, &mut cmd);
    flags::apply_service(flags::CLASSIC_RULES, service, &mut cmd);

    container_group(
        &primary,
        None,
        image,
        ctx.source_dir,
        name,
        &mut cmd,
        &mut warnings,
    );

    DeployPlan {
        build,
        deploy: cmd,
        warnings,
    }
}

/// `gcloud builds submit <dir> --tag=<image> --project=<project> --quiet`
fn build_command(source_dir: &Path, image: &str, project: &str) -> CommandLine {
    let mut cmd = CommandLine::gcloud();
    cmd.push("builds")
        .push("submit")
        .push(source_dir.display().to_string())
        .push_flag("tag", &FlagValue::Text(image.to_owned()))
        .push_flag("project", &FlagValue::Text(project.to_owned()))
        .push_flag("quiet", &FlagValue::On);
    cmd
}

fn image_of(spec: &ContainerSpec) -> Option<&str> {
    spec.image.as_deref().filter(|i| !i.is_empty())
}

fn container_group(
    spec: &ContainerSpec,
    id: Option<&str>,
    image: Option<&str>,
    source: Option<&Path>,
    label: &str,
    cmd: &mut CommandLine,
    warnings: &mut Vec<CompileWarning>,
) {
    let (secrets, invalid) = partition_secret_refs(&spec.secrets);
    warnings.extend(invalid.into_iter().map(|entry| CompileWarning::InvalidSecret {
        container: label.to_owned(),
        entry: entry.to_owned(),
    }));

    let input = ContainerInput {
        spec,
        id,
        image,
        source,
        secrets,
    };
    flags::apply_container(flags::CONTAINER_RULES, &input, cmd);
}
