//! System backup and restore commands

use anyhow::{bail, Result};
use k2s_psexec::ScriptParams;
use std::path::Path;

use super::common::CommandContext;
use crate::cli::{BackupArgs, RestoreArgs, SystemCommands};
use crate::output;

const BACKUP_SCRIPT: &str = "lib/scripts/k2s/system/backup/Backup-System.ps1";
const RESTORE_SCRIPT: &str = "lib/scripts/k2s/system/restore/Restore-System.ps1";

pub async fn run(cmd: SystemCommands, ctx: &CommandContext) -> Result<()> {
    ctx.ensure_installed()?;

    match cmd {
        SystemCommands::Backup(args) => backup(args, ctx).await,
        SystemCommands::Restore(args) => restore(args, ctx).await,
    }
}

fn path_param(path: &Path) -> Result<String> {
    Ok(std::path::absolute(path)?.to_string_lossy().into_owned())
}

async fn backup(args: BackupArgs, ctx: &CommandContext) -> Result<()> {
    let file = path_param(&args.file)?;
    let params = ScriptParams::new()
        .string("BackupFile", &file)
        .switch_if("SkipImages", args.skip_images);

    ctx.run_script(&ctx.script(BACKUP_SCRIPT), params, "Backing up system")
        .await?;

    output::success(&format!("Backup written to {}", file));
    Ok(())
}

async fn restore(args: RestoreArgs, ctx: &CommandContext) -> Result<()> {
    if !args.file.is_file() {
        bail!("Backup file not found: {}", args.file.display());
    }

    let file = path_param(&args.file)?;
    ctx.run_script(
        &ctx.script(RESTORE_SCRIPT),
        ScriptParams::new().string("BackupFile", &file),
        "Restoring system",
    )
    .await?;

    output::success(&format!("System restored from {}", file));
    Ok(())
}
