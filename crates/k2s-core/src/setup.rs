//! Setup status file (`setup.json`)
//!
//! Written by the install scripts, read by the CLI to decide whether the
//! system is installed and in a usable state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Content of setup.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetupInfo {
    /// Setup variant, e.g. "k2s"
    pub setup_name: String,

    /// Installed K2s version
    #[serde(default)]
    pub version: String,

    /// Linux-only installation (no Windows worker)
    #[serde(default)]
    pub linux_only: bool,

    /// Installation left in a corrupted state
    #[serde(default)]
    pub corrupted: bool,

    /// Kubernetes cluster name
    #[serde(default)]
    pub cluster_name: Option<String>,

    /// Addons enabled in the cluster
    #[serde(default)]
    pub enabled_addons: Vec<EnabledAddon>,
}

/// An enabled addon entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnabledAddon {
    pub name: String,

    /// Enabled implementation for addons with several implementations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
}

impl SetupInfo {
    /// Read setup.json
    ///
    /// Returns [`Error::SystemNotInstalled`] when the file does not exist and
    /// [`Error::SystemInCorruptedState`] when it is marked as corrupted.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No setup file at {:?}", path);
                return Err(Error::SystemNotInstalled);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let info: SetupInfo = serde_json::from_slice(&content)?;
        if info.corrupted {
            return Err(Error::SystemInCorruptedState);
        }

        Ok(info)
    }

    /// True when the addon implementation is enabled
    ///
    /// An entry without implementation matches the implementation named
    /// after the addon.
    pub fn is_addon_enabled(&self, addon: &str, implementation: &str) -> bool {
        self.enabled_addons.iter().any(|e| {
            e.name == addon && e.implementation.as_deref().unwrap_or(addon) == implementation
        })
    }

    /// Write setup.json, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> SetupInfo {
        SetupInfo {
            setup_name: "k2s".into(),
            version: "1.5.0".into(),
            linux_only: false,
            corrupted: false,
            cluster_name: Some("k2s-cluster".into()),
            enabled_addons: vec![
                EnabledAddon {
                    name: "dashboard".into(),
                    implementation: None,
                },
                EnabledAddon {
                    name: "ingress".into(),
                    implementation: Some("nginx".into()),
                },
            ],
        }
    }

    #[test]
    fn test_load_missing_is_not_installed() {
        let temp_dir = TempDir::new().unwrap();
        let result = SetupInfo::load(&temp_dir.path().join("setup.json"));
        assert!(matches!(result, Err(Error::SystemNotInstalled)));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("k2s").join("setup.json");
        sample().save(&path).unwrap();

        let loaded = SetupInfo::load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_is_addon_enabled() {
        let info = sample();
        assert!(info.is_addon_enabled("dashboard", "dashboard"));
        assert!(info.is_addon_enabled("ingress", "nginx"));
        assert!(!info.is_addon_enabled("ingress", "traefik"));
        assert!(!info.is_addon_enabled("metrics", "metrics"));
    }

    #[test]
    fn test_load_corrupted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("setup.json");
        std::fs::write(&path, r#"{ "SetupName": "k2s", "Corrupted": true }"#).unwrap();

        let result = SetupInfo::load(&path);
        assert!(matches!(result, Err(Error::SystemInCorruptedState)));
    }
}
