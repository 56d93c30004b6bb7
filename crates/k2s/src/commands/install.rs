//! Install command

use anyhow::{Context, Result};
use k2s_core::install_config::DEFAULT_INSTALL_CONFIG;
use k2s_core::{Failure, InstallConfig, InstallOverrides, SetupInfo, Severity};
use k2s_psexec::ScriptParams;
use tracing::debug;

use super::common::{report_failure, CommandContext};
use crate::cli::InstallArgs;
use crate::output;

const INSTALL_SCRIPT: &str = "lib/scripts/k2s/install/install.ps1";

impl From<&InstallArgs> for InstallOverrides {
    fn from(args: &InstallArgs) -> Self {
        Self {
            master_cpus: args.master_cpus.clone(),
            master_memory: args.master_memory.clone(),
            master_disk: args.master_disk.clone(),
            proxy: args.proxy.clone(),
            linux_only: args.linux_only.then_some(true),
        }
    }
}

/// Script parameters for an install config
fn install_params(config: &InstallConfig) -> ScriptParams {
    let resources = config.control_plane().map(|n| &n.resources);

    ScriptParams::new()
        .optional(
            "MasterVMProcessorCount",
            resources.and_then(|r| r.cpu.as_deref()),
        )
        .optional(
            "MasterVMMemory",
            resources.and_then(|r| r.memory.as_deref()),
        )
        .optional(
            "MasterDiskSize",
            resources.and_then(|r| r.disk.as_deref()),
        )
        .optional("Proxy", config.env.http_proxy.as_deref())
        .switch_if("LinuxOnly", config.behavior.linux_only)
}

pub async fn run(args: InstallArgs, ctx: &CommandContext) -> Result<()> {
    if let Ok(setup) = SetupInfo::load(&ctx.config.setup_file()) {
        return Err(report_failure(Failure::new(
            Severity::Warning,
            "system-already-installed",
            format!(
                "'{}' {} is already installed, uninstall it first",
                setup.setup_name, setup.version
            ),
        )));
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| ctx.script(DEFAULT_INSTALL_CONFIG));
    debug!("Using install config {:?}", config_path);

    let mut config = InstallConfig::load(&config_path)
        .with_context(|| format!("Failed to load install config {}", config_path.display()))?;
    config
        .apply(&InstallOverrides::from(&args))
        .context("Failed to apply install flags")?;

    ctx.run_script(
        &ctx.script(INSTALL_SCRIPT),
        install_params(&config),
        "Installing K2s",
    )
    .await?;

    output::success("K2s installed");
    Ok(())
}
