//! Addon commands generated from the catalog (enable, disable, ...)

use anyhow::{bail, Result};
use k2s_addons::{FlagValue, ScriptParameter};
use k2s_psexec::ScriptParams;
use tracing::debug;

use super::build::{self, QUIET_ARG, VERBOSE_ARG};
use crate::commands::common::CommandContext;
use crate::output;

/// Script parameters of the selected command
pub fn to_script_params(parameters: Vec<ScriptParameter>) -> ScriptParams {
    parameters
        .into_iter()
        .fold(ScriptParams::new(), |params, p| match p.value {
            FlagValue::Bool(v) => params.boolean(&p.name, v),
            FlagValue::Int(v) => params.number(&p.name, v),
            FlagValue::Float(v) => params.number(&p.name, v),
            FlagValue::String(v) => params.string(&p.name, &v),
        })
}

/// Run `k2s addons <command> ...`
///
/// `args[0]` is the command name as typed by the user.
pub async fn run(args: Vec<String>, ctx: &CommandContext) -> Result<()> {
    let Some(command) = args.first().cloned() else {
        bail!("Missing addon command");
    };

    let addons = ctx.addons()?;
    let Some(tree) = build::command_tree(&command, &addons) else {
        bail!(
            "Unknown addons command '{}', available: {}",
            command,
            addons.command_names().join(", ")
        );
    };

    let matches = match tree.try_get_matches_from(&args) {
        Ok(matches) => matches,
        Err(e) => e.exit(),
    };

    let Some(selection) = build::select(&command, &addons, &matches) else {
        bail!("Unable to resolve addon for '{}'", args.join(" "));
    };

    selection.cmd.validate_flags(&selection.values)?;

    // verbosity may also be given after the addon command
    let ctx = ctx.with_verbosity(
        ctx.verbose.max(matches.get_count(VERBOSE_ARG)),
        ctx.quiet || matches.get_flag(QUIET_ARG),
    );

    ctx.ensure_installed()?;

    let implementation = selection.implementation;
    let script = implementation.script_path(selection.cmd);
    let params = to_script_params(selection.cmd.script_parameters(&selection.values));
    debug!(
        "Addon '{}' command '{}' runs {}",
        implementation.addons_cmd_name,
        command,
        script.display()
    );

    ctx.run_script(
        &script,
        params,
        &format!("Running {} for '{}'", command, implementation.addons_cmd_name),
    )
    .await?;

    output::success(&format!(
        "'{}' {} done",
        implementation.addons_cmd_name, command
    ));
    Ok(())
}
