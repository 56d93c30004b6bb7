//! List addons and whether they are enabled

use anyhow::{Context, Result};
use k2s_addons::Addons;
use k2s_core::SetupInfo;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Modify, Style, Width},
    Table, Tabled,
};

use crate::cli::{AddonsListArgs, OutputFormat};
use crate::commands::common::CommandContext;
use crate::output;

/// One row per addon implementation
#[derive(Debug, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonRow {
    #[tabled(rename = "ADDON")]
    pub name: String,
    #[tabled(rename = "IMPLEMENTATION")]
    pub implementation: String,
    #[tabled(rename = "STATUS")]
    #[serde(skip)]
    pub status: String,
    #[tabled(skip)]
    pub enabled: bool,
    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
}

/// Rows sorted by addon, enabled implementations first within an addon
pub fn rows(addons: &Addons, setup: &SetupInfo) -> Vec<AddonRow> {
    let mut rows: Vec<AddonRow> = addons
        .sorted()
        .into_iter()
        .flat_map(|addon| {
            addon.spec.implementations.iter().map(move |implementation| {
                let enabled = setup.is_addon_enabled(&addon.metadata.name, &implementation.name);
                let implementation_name = if implementation.name == addon.metadata.name {
                    String::new()
                } else {
                    implementation.name.clone()
                };
                AddonRow {
                    name: addon.metadata.name.clone(),
                    implementation: implementation_name,
                    status: if enabled { "enabled" } else { "disabled" }.to_string(),
                    enabled,
                    description: if implementation.description.is_empty() {
                        addon.metadata.description.clone()
                    } else {
                        implementation.description.clone()
                    },
                }
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then(b.enabled.cmp(&a.enabled))
            .then(a.implementation.cmp(&b.implementation))
    });
    rows
}

pub async fn run(args: AddonsListArgs, ctx: &CommandContext) -> Result<()> {
    let setup = ctx.ensure_installed()?;
    let addons = ctx.addons()?;
    let rows = rows(&addons, &setup);

    if args.output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize addons")?;
        println!("{}", json);
        return Ok(());
    }

    if rows.is_empty() {
        output::warning("No addons found");
        return Ok(());
    }

    let enabled = rows.iter().filter(|r| r.enabled).count();

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .with(Modify::new(Columns::new(3..4)).with(Width::wrap(60).keep_words(true)));
    println!("{}", table);

    output::info(&format!("{} addon(s) enabled", enabled));
    Ok(())
}
