use std::path::Path;

use gantry_archive::ArchiveError;
use gantry_build::dockerfile::{self, ManifestError};
use gantry_build::executor::{CommandExecutor, RealExecutor};
use gantry_build::image::{self, ImageError};
use gantry_build::mirror::{self, MirrorError};
use gantry_build::toolchain::{self, BuildError};
use gantry_core::workspace::WorkspaceError;
use gantry_core::{GantryConfig, RunWorkspace};
use gantry_transport::client::{DeployClient, TransportError};
use gantry_transport::service::{HttpService, ReqwestService};

/// Which terminal branch a run takes after the archive is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTarget {
    /// Upload the package to the deployment service.
    Remote,
    /// Re-extract the package and build a container image locally.
    LocalImage,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Uploaded { status: u16, body: String },
    ImageBuilt { tag: String },
}

/// The deployment pipeline, parameterized over the subprocess executor and
/// the HTTP service handle for testability.
pub struct Pipeline<E: CommandExecutor = RealExecutor, H: HttpService = ReqwestService> {
    executor: E,
    deploy: DeployClient<H>,
}

impl Pipeline<RealExecutor, ReqwestService> {
    pub fn new(config: &GantryConfig) -> Self {
        Self {
            executor: RealExecutor,
            deploy: DeployClient::new(&config.deploy.service_name, &config.deploy.service_url),
        }
    }
}

impl<E: CommandExecutor, H: HttpService> Pipeline<E, H> {
    pub fn with_parts(executor: E, deploy: DeployClient<H>) -> Self {
        Self { executor, deploy }
    }

    /// Run the pipeline once.
    ///
    /// A fresh uniquely named workspace is allocated under the configured
    /// work directory and removed before this returns, whatever the
    /// outcome.
    pub async fn run(
        &self,
        project_dir: &Path,
        config: &GantryConfig,
        target: DeployTarget,
    ) -> Result<PipelineOutcome, PipelineError> {
        let workspace = RunWorkspace::create(&config.work_dir(), &config.project.bundle)
            .map_err(|e| PipelineError::Workspace { source: e })?;
        tracing::info!(run_id = workspace.run_id(), "run workspace created");

        let result = self
            .run_stages(project_dir, config, target, &workspace)
            .await;

        workspace.cleanup();
        result
    }

    async fn run_stages(
        &self,
        project_dir: &Path,
        config: &GantryConfig,
        target: DeployTarget,
        workspace: &RunWorkspace,
    ) -> Result<PipelineOutcome, PipelineError> {
        // Build
        let binary = workspace.staging_dir().join(&config.build.binary_name);
        toolchain::build_binary(&self.executor, &config.build, project_dir, &binary)
            .await
            .map_err(|e| PipelineError::Build { source: e })?;
        tracing::info!("binary built");

        // CopyConfigs
        mirror::copy_tree(
            &project_dir.join("configs"),
            &workspace.staging_dir().join("configs"),
        )
        .map_err(|e| PipelineError::CopyConfigs { source: e })?;
        tracing::info!("configs copied");

        // Manifest
        dockerfile::write_manifest(
            &workspace.staging_dir().join("Dockerfile"),
            &config.build.binary_name,
            config.image.port,
        )
        .map_err(|e| PipelineError::Manifest { source: e })?;
        tracing::info!("manifest written");

        // Archive
        gantry_archive::create_archive(workspace.staging_dir(), workspace.archive_path())
            .map_err(|e| PipelineError::Archive { source: e })?;
        tracing::info!(archive = %workspace.archive_path().display(), "bundle archived");

        match target {
            DeployTarget::Remote => {
                let response = self
                    .deploy
                    .upload(workspace.archive_path(), &config.deploy.endpoint)
                    .await
                    .map_err(|e| PipelineError::Upload { source: e })?;
                tracing::info!(status = response.status, "package uploaded");

                Ok(PipelineOutcome::Uploaded {
                    status: response.status,
                    body: response.body,
                })
            }
            DeployTarget::LocalImage => {
                let image_dir = workspace.image_dir();
                gantry_archive::extract_archive(workspace.archive_path(), &image_dir)
                    .map_err(|e| PipelineError::Extract { source: e })?;
                tracing::info!("package extracted for image build");

                let context = image_dir.join(&config.project.bundle);
                let tag = format!("{}:{}", config.project.bundle, workspace.run_id());
                image::build_image(&self.executor, &context, &tag)
                    .await
                    .map_err(|e| PipelineError::ImageBuild { source: e })?;

                Ok(PipelineOutcome::ImageBuilt { tag })
            }
        }
    }
}

/// A failed run, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("workspace setup failed")]
    Workspace { source: WorkspaceError },

    #[error("build stage failed")]
    Build { source: BuildError },

    #[error("config copy stage failed")]
    CopyConfigs { source: MirrorError },

    #[error("manifest stage failed")]
    Manifest { source: ManifestError },

    #[error("archive stage failed")]
    Archive { source: ArchiveError },

    #[error("extract stage failed")]
    Extract { source: ArchiveError },

    #[error("image build stage failed")]
    ImageBuild { source: ImageError },

    #[error("upload stage failed")]
    Upload { source: TransportError },
}

impl PipelineError {
    /// Short identifier of the failed stage.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Workspace { .. } => "workspace",
            Self::Build { .. } => "build",
            Self::CopyConfigs { .. } => "copy-configs",
            Self::Manifest { .. } => "manifest",
            Self::Archive { .. } => "archive",
            Self::Extract { .. } => "extract",
            Self::ImageBuild { .. } => "image-build",
            Self::Upload { .. } => "upload",
        }
    }
}
