//! `gcloud run deploy` compilation and execution for runcast.
//!
//! [`compile`] turns a [`runcast_core::DeploymentConfig`] into a
//! [`DeployPlan`] without touching the filesystem or spawning anything.
//! [`GcloudClient`] then hands the plan to a [`CommandExecutor`].

pub mod client;
pub mod command;
pub mod compile;
pub mod executor;
mod flags;
pub mod gcloud;
pub mod secrets;

pub use client::{DeployError, GcloudClient};
pub use command::{CommandLine, FlagValue};
pub use compile::{CompileContext, CompileError, CompileWarning, DeployPlan, compile};
pub use executor::{CommandExecutor, DryRunExecutor, RealExecutor};
pub use gcloud::ExecError;
