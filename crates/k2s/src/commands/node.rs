//! Node management commands

use anyhow::Result;
use k2s_psexec::ScriptParams;

use super::common::CommandContext;
use crate::cli::{NodeAddArgs, NodeCommands, NodeRemoveArgs};
use crate::output;

const ADD_SCRIPT: &str = "lib/scripts/k2s/node/add/Add.ps1";
const REMOVE_SCRIPT: &str = "lib/scripts/k2s/node/remove/Remove.ps1";

pub async fn run(cmd: NodeCommands, ctx: &CommandContext) -> Result<()> {
    ctx.ensure_installed()?;

    match cmd {
        NodeCommands::Add(args) => add(args, ctx).await,
        NodeCommands::Remove(args) => remove(args, ctx).await,
    }
}

async fn add(args: NodeAddArgs, ctx: &CommandContext) -> Result<()> {
    let params = ScriptParams::new()
        .string("IpAddress", &args.ip_addr)
        .string("UserName", &args.username)
        .optional("NodeName", args.name.as_deref());

    ctx.run_script(
        &ctx.script(ADD_SCRIPT),
        params,
        &format!("Adding node {}", args.name.as_deref().unwrap_or(&args.ip_addr)),
    )
    .await?;

    output::success("Node added");
    Ok(())
}

async fn remove(args: NodeRemoveArgs, ctx: &CommandContext) -> Result<()> {
    ctx.run_script(
        &ctx.script(REMOVE_SCRIPT),
        ScriptParams::new().string("NodeName", &args.name),
        &format!("Removing node {}", args.name),
    )
    .await?;

    output::success(&format!("Node {} removed", args.name));
    Ok(())
}
