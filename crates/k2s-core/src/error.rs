//! Error types for k2s-core

use thiserror::Error;

/// Result type alias using k2s-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for K2s
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Schema could not be compiled
    #[error("Failed to compile schema {name}: {message}")]
    SchemaCompile { name: String, message: String },

    /// Schema validation error
    #[error("Schema validation failed:\n{errors}")]
    SchemaValidation { errors: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// No setup.json found, K2s has not been installed
    #[error("system-not-installed")]
    SystemNotInstalled,

    /// setup.json marks the installation as corrupted
    #[error("system-in-corrupted-state")]
    SystemInCorruptedState,
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a schema compile error
    pub fn schema_compile(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaCompile {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a schema validation error from a list of errors
    pub fn schema_validation(errors: Vec<String>) -> Self {
        Self::SchemaValidation {
            errors: errors.join("\n"),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// True for the sentinel errors describing the installation state
    pub fn is_setup_state(&self) -> bool {
        matches!(self, Self::SystemNotInstalled | Self::SystemInCorruptedState)
    }
}
