//! Common test helpers for k2s-addons integration tests
//!
//! - Installation directory fixtures with the shipped manifest schema
//! - A counting `ManifestSource` for verifying disk access

use k2s_addons::{DiskSource, ManifestSource, SCHEMA_FILE_NAME};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// The manifest schema shipped with the CLI
pub const MANIFEST_SCHEMA: &str = include_str!("../../../../schemas/addon.manifest.schema.json");

// ─── Installation fixtures ───────────────────────────────────────────────────

/// Temporary installation directory with an `addons/` tree
pub struct InstallFixture {
    pub dir: TempDir,
}

impl InstallFixture {
    /// Installation directory containing only the schema
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("addons")).unwrap();
        std::fs::write(
            dir.path().join("addons").join(SCHEMA_FILE_NAME),
            MANIFEST_SCHEMA,
        )
        .unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn addons_dir(&self) -> PathBuf {
        self.dir.path().join("addons")
    }

    /// Write `<addons>/<relative>/addon.manifest.yaml`
    pub fn write_manifest(&self, relative: &str, content: &str) -> PathBuf {
        let dir = self.addons_dir().join(relative);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("addon.manifest.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }
}

// ─── Manifest builders ───────────────────────────────────────────────────────

/// Manifest with one implementation named after the addon
pub fn single_impl_manifest(name: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: Addon
metadata:
  name: {name}
  description: The {name} addon
spec:
  implementations:
    - name: {name}
      description: The {name} addon
      commands:
        enable:
          cli:
            flags:
              - name: replicas
                shorthand: r
                default: 1
                description: Number of replicas
                constraints:
                  kind: range
                  range:
                    min: 1
                    max: 5
            examples:
              - cmd: k2s addons enable {name}
          script:
            subPath: Enable.ps1
            parameterMappings:
              - cliFlagName: replicas
                scriptParameterName: Replicas
        disable:
          script:
            subPath: Disable.ps1
"#
    )
}

/// Ingress manifest with nginx and traefik implementations
pub fn ingress_manifest() -> String {
    r#"apiVersion: v1
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
          cli:
            flags:
              - name: proxy
                default: ""
                description: HTTP proxy
          script:
            subPath: Enable.ps1
            parameterMappings:
              - cliFlagName: proxy
                scriptParameterName: Proxy
      offline_usage:
        linux:
          additionalImages:
            - registry.k8s.io/ingress-nginx/controller:v1.11.2
    - name: traefik
      description: Traefik
      commands:
        enable:
          cli:
            flags:
              - name: dashboard
                default: false
              - name: mode
                default: default
                constraints:
                  kind: validation-set
                  validationSet: [default, secure]
          script:
            subPath: Enable.ps1
"#
    .to_string()
}

// ─── Counting source ─────────────────────────────────────────────────────────

/// Disk source recording how often it touches the filesystem
#[derive(Debug, Clone, Default)]
pub struct CountingSource {
    pub reads: Arc<AtomicUsize>,
    pub scans: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingSource {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl ManifestSource for CountingSource {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        DiskSource.read(path)
    }

    fn find_manifests(&self, root: &Path) -> std::io::Result<Vec<PathBuf>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        DiskSource.find_manifests(root)
    }
}
