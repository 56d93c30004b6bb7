//! Addon catalog loading
//!
//! Manifests live below `<install>/addons`, one `addon.manifest.yaml` per
//! addon directory. The catalog is scanned once per process and shared
//! afterwards.

use crate::error::{AddonError, Result};
use crate::types::{Addon, Addons};
use crate::validator::ManifestValidator;
use k2s_core::config::ADDONS_DIR;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;
use walkdir::WalkDir;

/// File name of an addon manifest
pub const MANIFEST_FILE_NAME: &str = "addon.manifest.yaml";

/// File name of the manifest schema inside the addons directory
pub const SCHEMA_FILE_NAME: &str = "addon.manifest.schema.json";

/// Filesystem access used while loading
pub trait ManifestSource: Send + Sync {
    /// Read a file
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;

    /// Paths of all manifest files below `root`
    fn find_manifests(&self, root: &Path) -> std::io::Result<Vec<PathBuf>>;
}

/// Reads manifests from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl ManifestSource for DiskSource {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn find_manifests(&self, root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut manifests = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME {
                manifests.push(entry.into_path());
            }
        }

        Ok(manifests)
    }
}

/// Lazily loaded addon catalog
///
/// The first successful [`load`](AddonCatalog::load) scans the addons
/// directory; later calls return the same shared catalog. A failed load is
/// not cached.
pub struct AddonCatalog<S: ManifestSource = DiskSource> {
    install_dir: PathBuf,
    source: S,
    cache: Mutex<Option<Arc<Addons>>>,
}

impl AddonCatalog<DiskSource> {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self::with_source(install_dir, DiskSource)
    }
}

impl<S: ManifestSource> AddonCatalog<S> {
    /// Catalog reading through a custom source
    pub fn with_source(install_dir: impl Into<PathBuf>, source: S) -> Self {
        Self {
            install_dir: install_dir.into(),
            source,
            cache: Mutex::new(None),
        }
    }

    /// Addons directory
    pub fn addons_dir(&self) -> PathBuf {
        self.install_dir.join(ADDONS_DIR)
    }

    /// Load all addons, scanning the directory on first use
    pub fn load(&self) -> Result<Arc<Addons>> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(addons) = cache.as_ref() {
            return Ok(Arc::clone(addons));
        }

        let addons = Arc::new(self.scan()?);
        *cache = Some(Arc::clone(&addons));
        Ok(addons)
    }

    fn scan(&self) -> Result<Addons> {
        let addons_dir = self.addons_dir();
        let schema_path = addons_dir.join(SCHEMA_FILE_NAME);

        let schema = self
            .source
            .read(&schema_path)
            .map_err(|source| AddonError::Read {
                path: schema_path.clone(),
                source,
            })?;
        let schema = k2s_core::SchemaValidator::from_slice("addon.manifest", &schema)
            .map_err(|source| AddonError::SchemaCompile {
                path: schema_path.clone(),
                source,
            })?;
        let validator = ManifestValidator::new(schema);

        let manifests =
            self.source
                .find_manifests(&addons_dir)
                .map_err(|source| AddonError::Walk {
                    path: addons_dir.clone(),
                    source,
                })?;

        let mut addons = Vec::with_capacity(manifests.len());
        for path in manifests {
            addons.push(self.load_manifest(&validator, &path)?);
        }

        debug!("Loaded {} addons from {:?}", addons.len(), addons_dir);
        Ok(Addons(addons))
    }

    fn load_manifest(&self, validator: &ManifestValidator, path: &Path) -> Result<Addon> {
        debug!("Loading addon manifest {:?}", path);

        let content = self.source.read(path).map_err(|source| AddonError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut addon = validator.validate(path, &content)?;
        let directory = path.parent().unwrap_or(Path::new(""));
        addon.set_directory(directory);

        Ok(addon)
    }
}
