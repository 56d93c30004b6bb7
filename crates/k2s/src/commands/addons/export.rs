//! Offline export and import of addons

use anyhow::{bail, Context, Result};
use k2s_addons::Addons;
use k2s_psexec::ScriptParams;

use crate::cli::{AddonExportArgs, AddonImportArgs};
use crate::commands::common::CommandContext;
use crate::output;

const EXPORT_SCRIPT: &str = "addons/Export.ps1";
const IMPORT_SCRIPT: &str = "addons/Import.ps1";

/// Check "<addon>" and "<addon> <implementation>" names against the catalog
pub fn check_names(names: &[String], addons: &Addons) -> Result<()> {
    let unknown: Vec<&str> = names
        .iter()
        .map(|n| n.as_str())
        .filter(|n| addons.find(n).is_none() && addons.resolve_cmd_name(n).is_none())
        .collect();

    if !unknown.is_empty() {
        bail!("Unknown addon(s): {}", unknown.join(", "));
    }
    Ok(())
}

pub async fn export(args: AddonExportArgs, ctx: &CommandContext) -> Result<()> {
    let addons = ctx.addons()?;
    check_names(&args.names, &addons)?;
    ctx.ensure_installed()?;

    let directory = std::path::absolute(&args.directory)
        .with_context(|| format!("Invalid export directory {}", args.directory.display()))?;

    let params = ScriptParams::new()
        .list("Names", &args.names)
        .string("ExportDir", &directory.to_string_lossy());

    ctx.run_script(&ctx.script(EXPORT_SCRIPT), params, "Exporting addons")
        .await?;

    output::success(&format!("Addons exported to {}", directory.display()));
    Ok(())
}

pub async fn import(args: AddonImportArgs, ctx: &CommandContext) -> Result<()> {
    if !args.zip.is_file() {
        bail!("Export archive not found: {}", args.zip.display());
    }
    ctx.ensure_installed()?;

    let zip = std::path::absolute(&args.zip)?;
    let params = ScriptParams::new()
        .string("ZipFile", &zip.to_string_lossy())
        .list("Names", &args.names);

    ctx.run_script(&ctx.script(IMPORT_SCRIPT), params, "Importing addons")
        .await?;

    // imported manifests are picked up by the next invocation
    output::success(&format!("Addons imported from {}", zip.display()));
    Ok(())
}
