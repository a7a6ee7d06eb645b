//! Core types and configuration for gantry.
//!
//! This crate defines the `gantry.toml` schema ([`GantryConfig`]), shared
//! error types, and the per-run workspace arena ([`RunWorkspace`]). Every
//! pipeline run owns one uniquely named workspace root; the staging bundle
//! and the finished archive live under it, and cleanup removes only that
//! root, so concurrent runs on the same host never touch each other's files.

pub mod config;
pub mod error;
pub mod workspace;

pub use config::{BuildConfig, DeployConfig, GantryConfig, ImageConfig, ProjectConfig};
pub use error::{Error, Result};
pub use workspace::{RunWorkspace, WorkspaceError};
