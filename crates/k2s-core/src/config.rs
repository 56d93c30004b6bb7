//! Installation layout and `cfg/config.json` loading

use crate::error::{Error, Result};
use crate::utils::{expand_home, read_config_file};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the installation directory
pub const INSTALL_DIR_ENV: &str = "K2S_INSTALL_DIR";

/// Environment variable overriding the K2s config directory
pub const CONFIG_DIR_ENV: &str = "K2S_CONFIG_DIR";

/// Relative path of the CLI config file inside the installation directory
pub const CONFIG_FILE: &str = "cfg/config.json";

/// Name of the setup status file inside the K2s config directory
pub const SETUP_FILE: &str = "setup.json";

/// Name of the addons directory inside the installation directory
pub const ADDONS_DIR: &str = "addons";

/// Raw content of `cfg/config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Config directories
    pub config_dir: ConfigDirs,

    /// Kubernetes cluster name
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,
}

/// Directory section of `cfg/config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDirs {
    /// K2s config directory holding setup.json
    pub k2s: String,

    /// kubeconfig directory
    #[serde(default = "default_kube_dir")]
    pub kube: String,
}

fn default_cluster_name() -> String {
    "k2s-cluster".to_string()
}

fn default_kube_dir() -> String {
    "~/.kube".to_string()
}

/// Resolved K2s configuration
#[derive(Debug, Clone)]
pub struct K2sConfig {
    /// Installation directory (contains addons/, cfg/, lib/)
    pub install_dir: PathBuf,

    /// K2s config directory (contains setup.json)
    pub k2s_config_dir: PathBuf,

    /// kubeconfig directory
    pub kube_config_dir: PathBuf,

    /// Kubernetes cluster name
    pub cluster_name: String,
}

impl K2sConfig {
    /// Load `cfg/config.json` from the installation directory
    ///
    /// `K2S_CONFIG_DIR` takes precedence over the configured k2s directory.
    pub fn load(install_dir: &Path) -> Result<Self> {
        let path = install_dir.join(CONFIG_FILE);
        debug!("Loading config from {:?}", path);

        let content = read_config_file(&path)?;
        let file: ConfigFile = serde_json::from_slice(&content).map_err(|e| {
            Error::invalid_config(format!("{}: {}", path.display(), e))
        })?;

        let k2s_config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => expand_home(&file.config_dir.k2s)?,
        };

        Ok(Self {
            install_dir: install_dir.to_path_buf(),
            k2s_config_dir,
            kube_config_dir: expand_home(&file.config_dir.kube)?,
            cluster_name: file.cluster_name,
        })
    }

    /// Path of setup.json
    pub fn setup_file(&self) -> PathBuf {
        self.k2s_config_dir.join(SETUP_FILE)
    }

    /// Addons directory
    pub fn addons_dir(&self) -> PathBuf {
        self.install_dir.join(ADDONS_DIR)
    }

    /// Absolute path of a script shipped in the installation directory
    pub fn script_path(&self, relative: &str) -> PathBuf {
        relative
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .fold(self.install_dir.clone(), |path, part| path.join(part))
    }
}

/// Resolve the installation directory
///
/// Order: explicit value, `K2S_INSTALL_DIR`, the parent of the executable's
/// directory when it contains `addons/`, the current directory.
pub fn resolve_install_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Ok(dir) = std::env::var(INSTALL_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        for candidate in exe.ancestors().skip(1).take(2) {
            if candidate.join(ADDONS_DIR).is_dir() {
                return Ok(candidate.to_path_buf());
            }
        }
    }

    Ok(std::env::current_dir()?)
}
