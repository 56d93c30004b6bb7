//! JSON Schema validation for K2s manifests and configuration files

use crate::error::{Error, Result};
use jsonschema::Validator;
use serde_json::Value;

/// A single compiled JSON schema
#[derive(Debug)]
pub struct SchemaValidator {
    schema: Validator,
}

impl SchemaValidator {
    /// Compile a schema from an already-parsed JSON value
    ///
    /// `name` identifies the schema in compile errors.
    pub fn new(name: &str, schema_value: &Value) -> Result<Self> {
        let schema = jsonschema::validator_for(schema_value)
            .map_err(|e| Error::schema_compile(name, e.to_string()))?;

        Ok(Self { schema })
    }

    /// Compile a schema from raw JSON bytes
    pub fn from_slice(name: &str, content: &[u8]) -> Result<Self> {
        let schema_value: Value = serde_json::from_slice(content)
            .map_err(|e| Error::schema_compile(name, e.to_string()))?;

        Self::new(name, &schema_value)
    }

    /// Validate JSON value against the schema
    pub fn validate(&self, value: &Value) -> Result<()> {
        let errors: Vec<String> = self
            .schema
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() {
                    format!("  - {}", e)
                } else {
                    format!("  - {}: {}", path, e)
                }
            })
            .collect();

        if !errors.is_empty() {
            return Err(Error::schema_validation(errors));
        }

        Ok(())
    }
}
