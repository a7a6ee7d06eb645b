use std::path::{Path, PathBuf};

use crate::multipart;
use crate::service::{HttpError, HttpService, ReqwestService};

/// Outcome of an upload attempt that reached the deployment service.
///
/// Non-2xx statuses are part of the result, not an error; the caller
/// decides what a rejection means.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Uploads finished deployment packages, parameterized over the HTTP
/// service handle for testability.
pub struct DeployClient<H: HttpService = ReqwestService> {
    service: H,
}

impl DeployClient<ReqwestService> {
    pub fn new(service_name: &str, base_url: &str) -> Self {
        Self {
            service: ReqwestService::new(service_name, base_url),
        }
    }
}

impl<H: HttpService> DeployClient<H> {
    pub fn with_service(service: H) -> Self {
        Self { service }
    }

    /// Post the archive as a multipart/form-data request to `endpoint`.
    ///
    /// The single part is named `file` and its filename is the archive's
    /// base name. The package is consumed once; the caller deletes it
    /// afterwards whatever the outcome.
    pub async fn upload(
        &self,
        archive_path: &Path,
        endpoint: &str,
    ) -> Result<UploadResponse, TransportError> {
        let content = std::fs::read(archive_path).map_err(|e| TransportError::OpenArchive {
            path: archive_path.to_path_buf(),
            source: e,
        })?;
        let file_name = archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TransportError::InvalidArchivePath(archive_path.to_path_buf()))?;

        let part = multipart::file_part("file", &file_name, &content);
        tracing::info!(
            archive = %archive_path.display(),
            bytes = part.body.len(),
            endpoint,
            "uploading deployment package"
        );

        let response = self
            .service
            .post(endpoint, &part.content_type, part.body)
            .await
            .map_err(|e| TransportError::Http { source: e })?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "deployment service rejected upload");
        }

        Ok(UploadResponse {
            status: response.status,
            body: response.body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open archive {path}")]
    OpenArchive {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("archive path has no file name: {0}")]
    InvalidArchivePath(PathBuf),

    #[error("upload failed")]
    Http { source: HttpError },
}
