//! Error types for k2s-addons

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using k2s-addons' error type
pub type Result<T> = std::result::Result<T, AddonError>;

/// Errors raised while loading the addon catalog
#[derive(Error, Debug)]
pub enum AddonError {
    /// The manifest schema could not be read or compiled
    #[error("failed to load addon manifest schema {path}: {source}")]
    SchemaCompile {
        path: PathBuf,
        #[source]
        source: k2s_core::Error,
    },

    /// A manifest file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest is not valid YAML or does not match the addon model
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A manifest violates the schema
    #[error("invalid addon manifest {path}: {source}")]
    SchemaViolation {
        path: PathBuf,
        #[source]
        source: k2s_core::Error,
    },

    /// A manifest declares an API version this CLI does not understand
    #[error("{path}: unsupported api version '{version}'")]
    UnsupportedApiVersion { path: PathBuf, version: String },

    /// A manifest passed the schema but is inconsistent
    #[error("invalid addon manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// The addons directory could not be scanned
    #[error("failed to scan addons directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AddonError {
    /// Path of the file or directory the error relates to
    pub fn path(&self) -> &std::path::Path {
        match self {
            AddonError::SchemaCompile { path, .. }
            | AddonError::Read { path, .. }
            | AddonError::Parse { path, .. }
            | AddonError::SchemaViolation { path, .. }
            | AddonError::UnsupportedApiVersion { path, .. }
            | AddonError::InvalidManifest { path, .. }
            | AddonError::Walk { path, .. } => path,
        }
    }
}
