use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// gantry.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GantryConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Bundle name; names the staging directory and the archive
    #[serde(default = "default_bundle")]
    pub bundle: String,
    /// Parent directory for per-run workspaces (defaults to the system temp dir)
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Compiler toolchain invoked as `<toolchain> build -o <out> .`
    #[serde(default = "default_toolchain")]
    pub toolchain: String,
    /// Target operating system (GOOS)
    #[serde(default = "default_target_os")]
    pub target_os: String,
    /// Target architecture (GOARCH)
    #[serde(default = "default_target_arch")]
    pub target_arch: String,
    /// Name of the compiled executable inside the bundle
    #[serde(default = "default_binary_name")]
    pub binary_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Port the container exposes
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Registered name of the deployment service, used in logs and errors
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Base URL of the deployment service
    #[serde(default = "default_service_url")]
    pub service_url: String,
    /// Path the archive is posted to, relative to the base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            bundle: default_bundle(),
            work_dir: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            toolchain: default_toolchain(),
            target_os: default_target_os(),
            target_arch: default_target_arch(),
            binary_name: default_binary_name(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_url: default_service_url(),
            endpoint: default_endpoint(),
        }
    }
}

impl GantryConfig {
    /// Load from gantry.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("gantry.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Parent directory for per-run workspaces.
    pub fn work_dir(&self) -> PathBuf {
        self.project
            .work_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

fn default_bundle() -> String {
    "app".to_owned()
}

fn default_toolchain() -> String {
    "go".to_owned()
}

fn default_target_os() -> String {
    "linux".to_owned()
}

fn default_target_arch() -> String {
    "amd64".to_owned()
}

fn default_binary_name() -> String {
    "main".to_owned()
}

fn default_port() -> u16 {
    8000
}

fn default_service_name() -> String {
    "deployment".to_owned()
}

fn default_service_url() -> String {
    "http://localhost:8000".to_owned()
}

fn default_endpoint() -> String {
    "deploy".to_owned()
}
