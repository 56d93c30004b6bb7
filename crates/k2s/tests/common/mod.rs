//! Common test helpers for k2s CLI tests
//!
//! - Installation directories with config, schema and addon manifests
//! - Running the built binary against them

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

pub const MANIFEST_SCHEMA: &str = include_str!("../../../../schemas/addon.manifest.schema.json");

// ─── Installation fixture ────────────────────────────────────────────────────

/// Temporary installation with `cfg/config.json` and a separate config dir
pub struct Installation {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl Installation {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("cfg")).unwrap();
        std::fs::create_dir_all(root.join("addons")).unwrap();
        std::fs::create_dir_all(root.join("config")).unwrap();

        let config = serde_json::json!({
            "configDir": {
                "k2s": root.join("config").to_string_lossy(),
                "kube": root.join("kube").to_string_lossy(),
            },
            "clusterName": "k2s-cluster",
        });
        std::fs::write(root.join("cfg").join("config.json"), config.to_string()).unwrap();
        std::fs::write(
            root.join("addons").join("addon.manifest.schema.json"),
            MANIFEST_SCHEMA,
        )
        .unwrap();

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `addons/<relative>/addon.manifest.yaml`
    pub fn with_manifest(self, relative: &str, content: &str) -> Self {
        let dir = self.path().join("addons").join(relative);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("addon.manifest.yaml"), content).unwrap();
        self
    }

    /// Mark the system as installed with the given enabled addons
    pub fn installed(self, enabled_addons: serde_json::Value) -> Self {
        let setup = serde_json::json!({
            "SetupName": "k2s",
            "Version": "1.5.0",
            "EnabledAddons": enabled_addons,
        });
        std::fs::write(
            self.path().join("config").join("setup.json"),
            setup.to_string(),
        )
        .unwrap();
        self
    }

    /// Run the k2s binary against this installation
    pub fn k2s(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_k2s"))
            .arg("--install-dir")
            .arg(self.path())
            .args(args)
            .env_remove("K2S_INSTALL_DIR")
            .env_remove("K2S_CONFIG_DIR")
            .env("NO_COLOR", "1")
            .output()
            .unwrap()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ─── Manifests ───────────────────────────────────────────────────────────────

pub const DASHBOARD_MANIFEST: &str = r#"apiVersion: v1
kind: Addon
metadata:
  name: dashboard
  description: Kubernetes dashboard
spec:
  implementations:
    - name: dashboard
      description: Kubernetes dashboard
      commands:
        enable:
          cli:
            flags:
              - name: replicas
                shorthand: r
                default: 1
                constraints:
                  kind: range
                  range:
                    min: 1
                    max: 3
          script:
            subPath: Enable.ps1
            parameterMappings:
              - cliFlagName: replicas
                scriptParameterName: Replicas
        disable:
          script:
            subPath: Disable.ps1
"#;

pub const INGRESS_MANIFEST: &str = r#"apiVersion: v1
kind: Addon
metadata:
  name: ingress
  description: Ingress controllers
spec:
  implementations:
    - name: nginx
      description: Ingress nginx
      commands:
        enable:
          script:
            subPath: Enable.ps1
    - name: traefik
      description: Traefik
      commands:
        enable:
          cli:
            flags:
              - name: mode
                default: default
                constraints:
                  kind: validation-set
                  validationSet: [default, secure]
          script:
            subPath: Enable.ps1
"#;
