//! Build output preparation for runcast.
//!
//! # Deploy pipeline
//!
//! ```text
//! runcast deploy
//!   1. Config      ── runcast.toml → RuncastConfig
//!   2. Output dir  ── [target].output_path (required)
//!   3. Dockerfile  ── stage_dockerfile() → <output>/Dockerfile
//!   4. Version tag ── package.json / pyproject.toml / Cargo.toml
//!   5. Cloud Run   ── gcloud [beta] run deploy
//! ```
//!
//! This crate owns step 3. The Dockerfile is copied byte for byte; runcast
//! never generates or rewrites it.

pub mod stage;

pub use stage::{STAGED_DOCKERFILE, StageError, stage_configured_dockerfile, stage_dockerfile};
