//! Addon command trees generated from the catalog
//!
//! For `k2s addons enable ingress nginx --proxy x` the tree of `enable` has
//! one subcommand per addon declaring `enable`, and one nested subcommand per
//! implementation that is not named after its addon. Flags come from the
//! manifest's `CliFlag` definitions.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use k2s_addons::{Addon, AddonCmd, Addons, CliFlag, FlagValue, FlagValues, Implementation};

pub const VERBOSE_ARG: &str = "verbose";
pub const QUIET_ARG: &str = "quiet";

const RESERVED_SHORTS: [char; 3] = ['v', 'q', 'h'];

/// Build the command tree of `k2s addons <command>`
///
/// Returns `None` when no addon declares the command.
pub fn command_tree(command: &str, addons: &Addons) -> Option<Command> {
    let subcommands: Vec<Command> = addons
        .sorted()
        .into_iter()
        .filter_map(|addon| addon_command(command, addon))
        .collect();

    if subcommands.is_empty() {
        return None;
    }

    Some(
        Command::new(command.to_string())
            .bin_name(format!("k2s addons {}", command))
            .about(format!("Run '{}' for an addon", command))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                Arg::new(VERBOSE_ARG)
                    .short('v')
                    .long("verbose")
                    .action(ArgAction::Count)
                    .global(true)
                    .hide(true),
            )
            .arg(
                Arg::new(QUIET_ARG)
                    .short('q')
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .global(true)
                    .hide(true),
            )
            .subcommands(subcommands),
    )
}

fn addon_command(command: &str, addon: &Addon) -> Option<Command> {
    let name = &addon.metadata.name;
    let mut default_cmd = None;
    let mut variants = Vec::new();

    for implementation in &addon.spec.implementations {
        let Some(cmd) = implementation.commands.get(command) else {
            continue;
        };
        if implementation.name == *name {
            default_cmd = Some(cmd);
        } else {
            variants.push(implementation_command(implementation, cmd));
        }
    }

    if default_cmd.is_none() && variants.is_empty() {
        return None;
    }

    let mut addon_cmd = Command::new(name.clone()).about(addon.metadata.description.clone());
    match default_cmd {
        Some(cmd) => addon_cmd = with_cli(addon_cmd, cmd),
        None => addon_cmd = addon_cmd.subcommand_required(true),
    }

    if !variants.is_empty() {
        addon_cmd = addon_cmd
            .subcommand_value_name("IMPLEMENTATION")
            .args_conflicts_with_subcommands(true)
            .subcommands(variants);
    }

    Some(addon_cmd)
}

fn implementation_command(implementation: &Implementation, cmd: &AddonCmd) -> Command {
    let sub = Command::new(implementation.name.clone()).about(implementation.description.clone());
    with_cli(sub, cmd)
}

fn with_cli(mut command: Command, cmd: &AddonCmd) -> Command {
    for flag in cmd.flags() {
        command = command.arg(flag_arg(flag));
    }

    if let Some(cli) = &cmd.cli_config {
        if !cli.examples.is_empty() {
            command = command.after_help(format!("Examples:\n{}", cli.examples));
        }
    }

    command
}

/// Clap argument for a manifest flag
pub fn flag_arg(flag: &CliFlag) -> Arg {
    let mut arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .help(flag.full_description());

    // -v, -q and -h stay with the global arguments
    if let Some(short) = flag
        .shorthand
        .as_deref()
        .and_then(|s| s.chars().next())
        .filter(|c| !RESERVED_SHORTS.contains(c))
    {
        arg = arg.short(short);
    }

    match &flag.default {
        FlagValue::Bool(default) => arg
            .value_parser(value_parser!(bool))
            .num_args(0..=1)
            .require_equals(true)
            .default_value(default.to_string())
            .default_missing_value("true"),
        FlagValue::Int(default) => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .default_value(default.to_string()),
        FlagValue::Float(default) => arg
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true)
            .default_value(default.to_string()),
        FlagValue::String(default) if default.is_empty() => arg,
        FlagValue::String(default) => arg.default_value(default.clone()),
    }
}

/// An addon command picked on the command line
#[derive(Debug)]
pub struct Selection<'a> {
    pub addon: &'a Addon,
    pub implementation: &'a Implementation,
    pub cmd: &'a AddonCmd,
    pub values: FlagValues,
}

/// Resolve matches of [`command_tree`] against the catalog
pub fn select<'a>(command: &str, addons: &'a Addons, matches: &ArgMatches) -> Option<Selection<'a>> {
    let (addon_name, addon_matches) = matches.subcommand()?;
    let addon = addons.find(addon_name)?;

    let (implementation, flag_matches) = match addon_matches.subcommand() {
        Some((impl_name, impl_matches)) => (addon.implementation(impl_name)?, impl_matches),
        None => (addon.default_implementation()?, addon_matches),
    };
    let cmd = implementation.commands.get(command)?;

    Some(Selection {
        addon,
        implementation,
        cmd,
        values: flag_values(cmd.flags(), flag_matches),
    })
}

/// Typed values of the given flags
pub fn flag_values(flags: &[CliFlag], matches: &ArgMatches) -> FlagValues {
    flags
        .iter()
        .filter_map(|flag| {
            let id = flag.name.as_str();
            let value = match &flag.default {
                FlagValue::Bool(_) => matches.get_one::<bool>(id).copied().map(FlagValue::Bool),
                FlagValue::Int(_) => matches.get_one::<i64>(id).copied().map(FlagValue::Int),
                FlagValue::Float(_) => matches.get_one::<f64>(id).copied().map(FlagValue::Float),
                FlagValue::String(_) => matches
                    .get_one::<String>(id)
                    .cloned()
                    .map(FlagValue::String),
            }?;
            Some((flag.name.clone(), value))
        })
        .collect()
}
