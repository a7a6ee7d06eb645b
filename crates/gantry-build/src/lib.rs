//! Bundle assembly for gantry: binary build, config mirroring, manifest.
//!
//! # Staging pipeline
//!
//! ```text
//! gantry deploy
//!   1. Build     ── CGO_ENABLED=0 GOOS=<os> GOARCH=<arch> go build -o <staging>/main .
//!   2. Configs   ── copy_tree(configs/, <staging>/configs/)
//!   3. Manifest  ── DockerfileGenerator::render() → <staging>/Dockerfile
//! ```
//!
//! All subprocess work goes through [`CommandExecutor`], so tests swap in a
//! mock and assert on the exact program, arguments, environment, and working
//! directory of each invocation.

pub mod dockerfile;
pub mod executor;
pub mod image;
pub mod mirror;
pub mod toolchain;

pub use dockerfile::DockerfileGenerator;
pub use executor::{CommandExecutor, CommandOutput, CommandSpec, ExecError, RealExecutor};
