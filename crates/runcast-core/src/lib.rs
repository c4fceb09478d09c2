//! Core types and configuration for runcast.
//!
//! This crate defines the `runcast.toml` schema ([`RuncastConfig`]),
//! version tag resolution from project manifests ([`resolve_version_tag`]),
//! and shared error types.

pub mod config;
pub mod error;
pub mod manifest;

pub use config::{
    BuildMode, ContainerSpec, DeploymentConfig, ExecutionEnvironment, Ingress, Profile,
    RuncastConfig, SidecarSpec, TargetConfig, VolumeMount, VpcEgress,
};
pub use error::{Error, Result};
pub use manifest::{ManifestKind, ManifestWarning, ResolvedVersion, VersionTag, resolve_version_tag};
