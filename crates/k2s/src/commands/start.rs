//! Start and stop commands

use anyhow::Result;
use k2s_psexec::ScriptParams;

use super::common::CommandContext;
use crate::output;

const START_SCRIPT: &str = "lib/scripts/k2s/start/start.ps1";
const STOP_SCRIPT: &str = "lib/scripts/k2s/stop/stop.ps1";

pub async fn start(ctx: &CommandContext) -> Result<()> {
    ctx.ensure_installed()?;

    ctx.run_script(&ctx.script(START_SCRIPT), ScriptParams::new(), "Starting K2s")
        .await?;

    output::success("K2s started");
    Ok(())
}

pub async fn stop(ctx: &CommandContext) -> Result<()> {
    ctx.ensure_installed()?;

    ctx.run_script(&ctx.script(STOP_SCRIPT), ScriptParams::new(), "Stopping K2s")
        .await?;

    output::success("K2s stopped");
    Ok(())
}
