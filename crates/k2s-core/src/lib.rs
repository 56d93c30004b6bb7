//! # k2s-core
//!
//! Core library for the K2s CLI providing:
//! - Installation and config directory resolution (`cfg/config.json`)
//! - Setup status file handling (`setup.json`)
//! - Install configuration (`install.yaml`) with CLI overrides
//! - JSON Schema validation
//! - Result types shared with the PowerShell scripts

pub mod config;
pub mod error;
pub mod install_config;
pub mod schema;
pub mod setup;
pub mod types;
pub mod utils;

pub use config::K2sConfig;
pub use error::{Error, Result};
pub use install_config::{InstallConfig, InstallOverrides};
pub use schema::SchemaValidator;
pub use setup::{EnabledAddon, SetupInfo};
pub use types::{CmdResult, Failure, Severity};
pub use utils::{expand_home, get_home_dir};
