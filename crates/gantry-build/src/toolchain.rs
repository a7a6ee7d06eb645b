use std::path::Path;

use gantry_core::BuildConfig;

use crate::executor::{CommandExecutor, CommandSpec, ExecError};

/// Compile the service into a single statically linked executable.
///
/// Runs `<toolchain> build -o <output> .` in `project_dir` with dynamic
/// linking disabled and the target platform pinned, so the binary runs in
/// the alpine-based container regardless of the host platform.
pub async fn build_binary<E: CommandExecutor>(
    executor: &E,
    config: &BuildConfig,
    project_dir: &Path,
    output: &Path,
) -> Result<(), BuildError> {
    let output_str = output
        .to_str()
        .ok_or_else(|| BuildError::InvalidOutputPath(output.to_path_buf()))?;

    let spec = CommandSpec::new(&config.toolchain, &["build", "-o", output_str, "."])
        .env("CGO_ENABLED", "0")
        .env("GOOS", &config.target_os)
        .env("GOARCH", &config.target_arch)
        .cwd(project_dir);

    executor
        .exec(&spec)
        .await
        .map_err(|e| BuildError::Toolchain { source: e })?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("output path is not valid UTF-8: {0}")]
    InvalidOutputPath(std::path::PathBuf),

    #[error("toolchain build failed")]
    Toolchain { source: ExecError },
}
