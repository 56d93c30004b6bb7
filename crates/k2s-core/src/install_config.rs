//! Install configuration (`install.yaml`)
//!
//! The default configuration ships in `<install>/cfg/install.yaml`. Users
//! may pass their own file with `--config`; single values can further be
//! overwritten by CLI flags.
//!
//! ```yaml
//! kind: k2s
//! apiVersion: v1
//! nodes:
//!   - role: control-plane
//!     resources:
//!       cpu: "6"
//!       memory: 6GB
//!       disk: 50GB
//! env:
//!   httpProxy: http://proxy:8080
//! behavior:
//!   linuxOnly: false
//! ```

use crate::error::{Error, Result};
use crate::utils::read_config_file;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative path of the default install config
pub const DEFAULT_INSTALL_CONFIG: &str = "cfg/install.yaml";

const CONTROL_PLANE_ROLE: &str = "control-plane";

/// Install configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    pub kind: String,

    pub api_version: String,

    #[serde(default)]
    pub nodes: Vec<NodeConfig>,

    #[serde(default)]
    pub env: EnvConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// A node entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node role, "control-plane" or "worker"
    pub role: String,

    #[serde(default)]
    pub resources: NodeResources,
}

/// VM resources of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeResources {
    #[serde(default)]
    pub cpu: Option<String>,

    #[serde(default)]
    pub memory: Option<String>,

    #[serde(default)]
    pub disk: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvConfig {
    #[serde(default)]
    pub http_proxy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorConfig {
    #[serde(default)]
    pub linux_only: bool,
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct InstallOverrides {
    pub master_cpus: Option<String>,
    pub master_memory: Option<String>,
    pub master_disk: Option<String>,
    pub proxy: Option<String>,
    pub linux_only: Option<bool>,
}

impl InstallOverrides {
    fn touches_control_plane(&self) -> bool {
        self.master_cpus.is_some() || self.master_memory.is_some() || self.master_disk.is_some()
    }
}

impl InstallConfig {
    /// Load an install config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        let config: InstallConfig = serde_yaml_ng::from_slice(&content)?;

        if config.kind != "k2s" {
            return Err(Error::invalid_config(format!(
                "{}: unsupported kind '{}'",
                path.display(),
                config.kind
            )));
        }

        Ok(config)
    }

    /// Control-plane node entry
    pub fn control_plane(&self) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.role == CONTROL_PLANE_ROLE)
    }

    fn control_plane_mut(&mut self) -> Option<&mut NodeConfig> {
        self.nodes.iter_mut().find(|n| n.role == CONTROL_PLANE_ROLE)
    }

    /// Overwrite file values with CLI values
    pub fn apply(&mut self, overrides: &InstallOverrides) -> Result<()> {
        if overrides.touches_control_plane() {
            let node = self
                .control_plane_mut()
                .ok_or_else(|| Error::missing_field("nodes[role=control-plane]"))?;

            if let Some(cpus) = &overrides.master_cpus {
                node.resources.cpu = Some(cpus.clone());
            }
            if let Some(memory) = &overrides.master_memory {
                node.resources.memory = Some(memory.clone());
            }
            if let Some(disk) = &overrides.master_disk {
                node.resources.disk = Some(disk.clone());
            }
        }

        if let Some(proxy) = &overrides.proxy {
            self.env.http_proxy = Some(proxy.clone());
        }
        if let Some(linux_only) = overrides.linux_only {
            self.behavior.linux_only = linux_only;
        }

        Ok(())
    }
}
