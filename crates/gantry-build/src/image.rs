use std::path::Path;

use crate::executor::{CommandExecutor, CommandSpec, ExecError};

/// Build a container image from an extracted bundle directory.
///
/// The tag must be unique per run; the orchestrator derives it from the run
/// id so repeated or concurrent runs never collide.
pub async fn build_image<E: CommandExecutor>(
    executor: &E,
    context_dir: &Path,
    tag: &str,
) -> Result<(), ImageError> {
    let spec = CommandSpec::new("docker", &["build", "-t", tag, "."]).cwd(context_dir);

    executor
        .exec(&spec)
        .await
        .map_err(|e| ImageError::Build { source: e })?;

    tracing::info!(tag, "container image built");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("container image build failed")]
    Build { source: ExecError },
}
