//! The gantry deployment pipeline.
//!
//! One [`Pipeline::run`] call drives the fixed stage order
//!
//! ```text
//! Build → CopyConfigs → Manifest → Archive → Upload
//!                                          ↘ Extract → ImageBuild   (--image)
//! ```
//!
//! over a per-run [`RunWorkspace`](gantry_core::RunWorkspace). The first
//! failing stage short-circuits the rest and becomes the run's
//! [`PipelineError`]; the workspace is removed on every exit path, success
//! or failure, with removal problems logged and swallowed.

pub mod pipeline;

pub use pipeline::{DeployTarget, Pipeline, PipelineError, PipelineOutcome};
