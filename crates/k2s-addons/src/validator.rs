//! Addon manifest validation
//!
//! JSON Schema validation of the raw YAML followed by checks the schema
//! cannot express.

use crate::error::{AddonError, Result};
use crate::types::Addon;
use k2s_core::SchemaValidator;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// API versions this CLI understands
pub const SUPPORTED_API_VERSIONS: &[&str] = &["v1"];

/// Validates addon.manifest.yaml content
pub struct ManifestValidator {
    schema: SchemaValidator,
}

impl ManifestValidator {
    pub fn new(schema: SchemaValidator) -> Self {
        Self { schema }
    }

    /// Validate manifest content read from `path`
    ///
    /// 1. JSON Schema validation of the untyped document
    /// 2. Deserialization into [`Addon`]
    /// 3. Semantic validation
    pub fn validate(&self, path: &Path, content: &[u8]) -> Result<Addon> {
        let parse_err = |source| AddonError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let value: Value = serde_yaml_ng::from_slice(content).map_err(parse_err)?;
        self.schema
            .validate(&value)
            .map_err(|source| AddonError::SchemaViolation {
                path: path.to_path_buf(),
                source,
            })?;

        let addon: Addon = serde_yaml_ng::from_slice(content).map_err(parse_err)?;
        validate_addon(path, &addon)?;

        debug!("Addon {} is valid", addon.metadata.name);
        Ok(addon)
    }
}

/// Checks beyond the schema
fn validate_addon(path: &Path, addon: &Addon) -> Result<()> {
    if !SUPPORTED_API_VERSIONS.contains(&addon.api_version.as_str()) {
        return Err(AddonError::UnsupportedApiVersion {
            path: path.to_path_buf(),
            version: addon.api_version.clone(),
        });
    }

    let invalid = |message: String| AddonError::InvalidManifest {
        path: path.to_path_buf(),
        message,
    };

    for implementation in &addon.spec.implementations {
        for (cmd_name, cmd) in &implementation.commands {
            if cmd.script_config.sub_path.trim().is_empty() {
                return Err(invalid(format!(
                    "{}/{}: command '{}' has no script subPath",
                    addon.metadata.name, implementation.name, cmd_name
                )));
            }

            let flags: HashSet<&str> = cmd
                .cli_config
                .iter()
                .flat_map(|c| c.flags.iter().map(|f| f.name.as_str()))
                .collect();

            for mapping in &cmd.script_config.parameter_mappings {
                if !flags.contains(mapping.cli_flag_name.as_str()) {
                    return Err(invalid(format!(
                        "{}/{}: command '{}' maps undeclared flag '{}'",
                        addon.metadata.name, implementation.name, cmd_name, mapping.cli_flag_name
                    )));
                }
            }
        }
    }

    Ok(())
}
