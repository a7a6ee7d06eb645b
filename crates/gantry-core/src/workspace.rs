use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Disposable filesystem arena owned by a single pipeline run.
///
/// The root directory is named after a fresh run id, so concurrent runs on
/// the same host operate on disjoint trees. Layout:
///
/// ```text
/// <base>/gantry-<run id>/
///   <bundle>/        staging bundle (binary, configs, Dockerfile)
///   <bundle>.zip     finished archive
///   image/           extraction target for the local-image branch
/// ```
///
/// [`cleanup`](RunWorkspace::cleanup) removes the root and everything under
/// it; it never touches paths outside the root.
#[derive(Debug)]
pub struct RunWorkspace {
    run_id: String,
    root: PathBuf,
    staging: PathBuf,
    archive: PathBuf,
}

impl RunWorkspace {
    /// Allocate a fresh workspace under `base` and create its staging directory.
    pub fn create(base: &Path, bundle: &str) -> Result<Self, WorkspaceError> {
        let run_id = Uuid::new_v4().simple().to_string();
        let root = base.join(format!("gantry-{run_id}"));

        std::fs::create_dir_all(&root).map_err(|e| WorkspaceError::CreateRoot {
            path: root.clone(),
            source: e,
        })?;

        let staging = root.join(bundle);
        std::fs::create_dir(&staging).map_err(|e| WorkspaceError::CreateStaging {
            path: staging.clone(),
            source: e,
        })?;

        let archive = root.join(format!("{bundle}.zip"));

        Ok(Self {
            run_id,
            root,
            staging,
            archive,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staging bundle directory: the tree that gets archived.
    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    /// Where the finished archive is written.
    pub fn archive_path(&self) -> &Path {
        &self.archive
    }

    /// Extraction target for the local-image branch.
    pub fn image_dir(&self) -> PathBuf {
        self.root.join("image")
    }

    /// Best-effort removal of the workspace root.
    ///
    /// Failures are logged and swallowed; they never override the run's
    /// primary result.
    pub fn cleanup(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            tracing::warn!(
                run_id = %self.run_id,
                path = %self.root.display(),
                error = %e,
                "failed to remove run workspace"
            );
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace root {path}")]
    CreateRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create staging directory {path}")]
    CreateStaging {
        path: PathBuf,
        source: std::io::Error,
    },
}
