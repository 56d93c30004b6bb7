//! Uninstall command

use anyhow::Result;
use k2s_psexec::ScriptParams;

use super::common::CommandContext;
use crate::cli::UninstallArgs;
use crate::output;

const UNINSTALL_SCRIPT: &str = "lib/scripts/k2s/uninstall/uninstall.ps1";

pub async fn run(args: UninstallArgs, ctx: &CommandContext) -> Result<()> {
    let setup = ctx.ensure_installed()?;

    let params = ScriptParams::new().switch_if(
        "DeleteFilesForOfflineInstallation",
        args.delete_files_for_offline_installation,
    );

    ctx.run_script(
        &ctx.script(UNINSTALL_SCRIPT),
        params,
        &format!("Uninstalling {}", setup.setup_name),
    )
    .await?;

    output::success("K2s uninstalled");
    Ok(())
}
