//! Addon management for K2s
//!
//! This crate handles:
//! - The addon manifest model (`addon.manifest.yaml`)
//! - Constraint checks for addon CLI flag values
//! - Schema and semantic validation of manifests
//! - Loading the addon catalog once per process
//! - Mapping CLI flag values to script parameters

pub mod constraints;
pub mod error;
pub mod loader;
pub mod params;
pub mod types;
pub mod validator;

pub use constraints::{Constraint, ConstraintError};
pub use error::{AddonError, Result};
pub use loader::{AddonCatalog, DiskSource, ManifestSource, MANIFEST_FILE_NAME, SCHEMA_FILE_NAME};
pub use params::{FlagError, FlagValues, ScriptParameter};
pub use types::{
    Addon, AddonCmd, AddonMetadata, AddonSpec, Addons, CliConfig, CliExample, CliExamples,
    CliFlag, CurlPackage, FlagValue, Implementation, OfflineUsage, ParameterMapping, ScriptConfig,
};
pub use validator::{ManifestValidator, SUPPORTED_API_VERSIONS};
