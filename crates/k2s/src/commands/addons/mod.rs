//! Addon commands
//!
//! - ls: list addons and whether they are enabled
//! - status: status of one addon implementation
//! - export / import: offline packages
//! - any other command (enable, disable, ...) is looked up in the addon
//!   manifests and built at runtime

pub mod build;
mod exec;
mod export;
mod list;
mod status;

use anyhow::Result;

use super::common::CommandContext;
use crate::cli::AddonsCommands;

/// Main entry point for addon subcommands
pub async fn run(cmd: AddonsCommands, ctx: &CommandContext) -> Result<()> {
    match cmd {
        AddonsCommands::Ls(args) => list::run(args, ctx).await,
        AddonsCommands::Status(args) => status::run(args, ctx).await,
        AddonsCommands::Export(args) => export::export(args, ctx).await,
        AddonsCommands::Import(args) => export::import(args, ctx).await,
        AddonsCommands::Dynamic(args) => exec::run(args, ctx).await,
    }
}
