//! CLI command implementations

pub mod addons;
pub mod common;
pub mod install;
pub mod node;
pub mod start;
pub mod status;
pub mod system;
pub mod uninstall;
