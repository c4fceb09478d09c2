//! Ordered flag tables for `gcloud run deploy`.
//!
//! Each table is a fixed sequence of `(flag name, emitter)` rules. An
//! emitter returns `None` when its input is absent, so the flag is left out
//! entirely. Tables are evaluated top to bottom, which makes the output
//! order part of the table itself.

use std::path::Path;

use runcast_core::{ContainerSpec, DeploymentConfig, VersionTag};

use crate::command::{CommandLine, FlagValue, join_list};

pub(crate) struct FlagRule<F> {
    pub name: &'static str,
    pub emit: F,
}

pub(crate) type ServiceRule = FlagRule<fn(&ServiceInput<'_>) -> Option<FlagValue>>;
pub(crate) type ContainerRule = FlagRule<fn(&ContainerInput<'_>) -> Option<FlagValue>>;

/// Service-level inputs, with required fields already validated.
pub(crate) struct ServiceInput<'a> {
    pub config: &'a DeploymentConfig,
    pub project: &'a str,
    pub region: &'a str,
    /// Only set when tagging was requested and a tag resolved.
    pub tag: Option<&'a VersionTag>,
}

/// One container group.
pub(crate) struct ContainerInput<'a> {
    pub spec: &'a ContainerSpec,
    /// `--container` qualifier; `None` in single-container deployments.
    pub id: Option<&'a str>,
    pub image: Option<&'a str>,
    /// Built with `--source` when no image is set.
    pub source: Option<&'a Path>,
    /// Secret references that passed validation.
    pub secrets: Vec<&'a str>,
}

pub(crate) fn apply_service(
    rules: &[ServiceRule],
    input: &ServiceInput<'_>,
    cmd: &mut CommandLine,
) {
    for rule in rules {
        if let Some(value) = (rule.emit)(input) {
            cmd.push_flag(rule.name, &value);
        }
    }
}

pub(crate) fn apply_container(
    rules: &[ContainerRule],
    input: &ContainerInput<'_>,
    cmd: &mut CommandLine,
) {
    for rule in rules {
        if let Some(value) = (rule.emit)(input) {
            cmd.push_flag(rule.name, &value);
        }
    }
}

fn number(value: Option<u32>) -> Option<FlagValue> {
    value.map(|v| FlagValue::Text(v.to_string()))
}

fn dict<'a>(entries: impl IntoIterator<Item = (&'a String, &'a String)>) -> Option<FlagValue> {
    let pairs: Vec<String> = entries.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
    list(&pairs)
}

fn list<S: AsRef<str>>(items: &[S]) -> Option<FlagValue> {
    (!items.is_empty()).then(|| FlagValue::Text(join_list(items)))
}

/// Non-empty volume descriptor, if any.
pub(crate) fn volume_of(config: &DeploymentConfig) -> Option<&str> {
    config.volume.as_deref().filter(|v| !v.is_empty())
}

const ALLOW_UNAUTHENTICATED: ServiceRule = FlagRule {
    name: "allow-unauthenticated",
    emit: |s| FlagValue::toggle(Some(s.config.allow_unauthenticated.unwrap_or(true))),
};

/// Service flags shared by both profiles, in emission order.
pub(crate) const SERVICE_RULES: &[ServiceRule] = &[
    FlagRule {
        name: "project",
        emit: |s| Some(FlagValue::Text(s.project.to_owned())),
    },
    FlagRule {
        name: "platform",
        emit: |_| Some(FlagValue::Text("managed".to_owned())),
    },
    FlagRule {
        name: "quiet",
        emit: |_| Some(FlagValue::On),
    },
    FlagRule {
        name: "region",
        emit: |s| Some(FlagValue::Text(s.region.to_owned())),
    },
    FlagRule {
        name: "min-instances",
        emit: |s| number(s.config.min_instances),
    },
    FlagRule {
        name: "max-instances",
        emit: |s| number(s.config.max_instances),
    },
    FlagRule {
        name: "concurrency",
        emit: |s| number(s.config.concurrency),
    },
    FlagRule {
        name: "ingress",
        emit: |s| s.config.ingress.map(|i| FlagValue::Text(i.as_str().to_owned())),
    },
    FlagRule {
        name: "vpc-connector",
        emit: |s| FlagValue::text(s.config.vpc_connector.as_deref()),
    },
    FlagRule {
        name: "vpc-egress",
        emit: |s| {
            s.config
                .vpc_egress
                .map(|e| FlagValue::Text(e.as_str().to_owned()))
        },
    },
    FlagRule {
        name: "execution-environment",
        emit: |s| {
            s.config
                .execution_environment
                .map(|e| FlagValue::Text(e.as_str().to_owned()))
        },
    },
    FlagRule {
        name: "timeout",
        emit: |s| FlagValue::text(s.config.timeout.as_deref()),
    },
    FlagRule {
        name: "cpu-boost",
        emit: |s| FlagValue::toggle(s.config.cpu_boost),
    },
    FlagRule {
        name: "service-account",
        emit: |s| FlagValue::text(s.config.service_account.as_deref()),
    },
    FlagRule {
        name: "add-cloudsql-instances",
        emit: |s| FlagValue::text(s.config.cloud_sql_instance.as_deref()),
    },
    FlagRule {
        name: "labels",
        emit: |s| dict(&s.config.labels),
    },
    FlagRule {
        name: "tag",
        emit: |s| s.tag.map(|t| FlagValue::Text(t.to_string())),
    },
    FlagRule {
        name: "revision-suffix",
        emit: |s| FlagValue::text(s.config.revision_suffix.as_deref()),
    },
    FlagRule {
        name: "no-traffic",
        emit: |s| (s.config.no_traffic == Some(true)).then_some(FlagValue::On),
    },
];

/// Service flags specific to the multi-container profile.
pub(crate) const MULTI_CONTAINER_RULES: &[ServiceRule] = &[
    FlagRule {
        name: "add-volume",
        emit: |s| volume_of(s.config).map(|v| FlagValue::Text(format!("name={v}"))),
    },
    ALLOW_UNAUTHENTICATED,
];

/// Service flags specific to the classic profile.
pub(crate) const CLASSIC_RULES: &[ServiceRule] = &[
    FlagRule {
        name: "use-http2",
        emit: |s| FlagValue::toggle(s.config.http2),
    },
    ALLOW_UNAUTHENTICATED,
];

/// Flags describing one container, in emission order.
pub(crate) const CONTAINER_RULES: &[ContainerRule] = &[
    FlagRule {
        name: "container",
        emit: |c| FlagValue::text(c.id),
    },
    FlagRule {
        name: "image",
        emit: |c| FlagValue::text(c.image),
    },
    FlagRule {
        name: "source",
        emit: |c| match (c.image, c.source) {
            (None, Some(dir)) => Some(FlagValue::Text(dir.display().to_string())),
            _ => None,
        },
    },
    FlagRule {
        name: "port",
        emit: |c| c.spec.port.map(|p| FlagValue::Text(p.to_string())),
    },
    FlagRule {
        name: "cpu",
        emit: |c| FlagValue::text(c.spec.cpu.as_deref()),
    },
    FlagRule {
        name: "memory",
        emit: |c| FlagValue::text(c.spec.memory.as_deref()),
    },
    FlagRule {
        name: "command",
        emit: |c| list(&c.spec.command),
    },
    FlagRule {
        name: "args",
        emit: |c| list(&c.spec.args),
    },
    FlagRule {
        name: "set-env-vars",
        emit: |c| dict(&c.spec.env),
    },
    FlagRule {
        name: "set-secrets",
        emit: |c| list(&c.secrets),
    },
    FlagRule {
        name: "add-volume-mount",
        emit: |c| {
            c.spec.volume_mount.as_ref().map(|m| {
                FlagValue::Text(format!("volume={},mount-path={}", m.volume, m.mount_path))
            })
        },
    },
    FlagRule {
        name: "depends-on",
        emit: |c| list(&c.spec.depends_on),
    },
];
