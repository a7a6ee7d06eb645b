use std::path::Path;

/// Generates the container build descriptor for a staged bundle.
///
/// The image is a plain alpine runtime: trusted root certificates and
/// timezone data installed, the compiled executable and the config tree
/// copied in, one exposed port, and the executable as the start command.
pub struct DockerfileGenerator<'a> {
    executable: &'a str,
    port: u16,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(executable: &'a str, port: u16) -> Self {
        Self { executable, port }
    }

    pub fn render(&self) -> String {
        format!(
            r#"FROM alpine:latest
RUN apk add --no-cache tzdata ca-certificates
COPY ./{exe} /{exe}
COPY /configs /configs
RUN chmod +x /{exe}
EXPOSE {port}
CMD ["/{exe}"]
"#,
            exe = self.executable,
            port = self.port,
        )
    }
}

/// Render the descriptor and write it to `dest`.
pub fn write_manifest(dest: &Path, executable: &str, port: u16) -> Result<(), ManifestError> {
    let content = DockerfileGenerator::new(executable, port).render();
    std::fs::write(dest, content).map_err(|e| ManifestError::Write {
        path: dest.to_path_buf(),
        source: e,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to write Dockerfile at {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
