//! Shared helpers for commands running scripts

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use k2s_addons::{AddonCatalog, Addons};
use k2s_core::types::CMD_RESULT_MESSAGE_TYPE;
use k2s_core::{CmdResult, Failure, K2sConfig, SetupInfo};
use k2s_psexec::{
    format_script_path, CancellationToken, ExecOptions, PowerShellVersion, PsExecutor,
    ScriptParams,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::output::{self, TerminalSink};

/// Switch enabling script log output
const SHOW_LOGS_PARAM: &str = "ShowLogs";

/// A failure that was already shown to the user
#[derive(Debug)]
pub struct ReportedFailure(pub Failure);

impl std::fmt::Display for ReportedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ReportedFailure {}

/// Print a script failure unless the script did already, then fail
pub fn report_failure(failure: Failure) -> anyhow::Error {
    if !failure.suppress_cli_output {
        output::failure(&failure);
    }
    ReportedFailure(failure).into()
}

/// Turn a script result into the command result
pub fn check_result(result: CmdResult) -> Result<()> {
    match result.failure {
        Some(failure) => Err(report_failure(failure)),
        None => Ok(()),
    }
}

/// Everything a command needs to run scripts
#[derive(Clone)]
pub struct CommandContext {
    pub config: K2sConfig,
    pub catalog: Arc<AddonCatalog>,
    pub verbose: u8,
    pub quiet: bool,
    pub cancel: CancellationToken,
}

impl CommandContext {
    pub fn load(
        install_dir: &Path,
        verbose: u8,
        quiet: bool,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let config = K2sConfig::load(install_dir).with_context(|| {
            format!("Failed to load K2s config from {}", install_dir.display())
        })?;

        Ok(Self {
            catalog: Arc::new(AddonCatalog::new(&config.install_dir)),
            config,
            verbose,
            quiet,
            cancel,
        })
    }

    /// Same context with other output settings
    pub fn with_verbosity(&self, verbose: u8, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            ..self.clone()
        }
    }

    /// The addon catalog, loaded on first use
    pub fn addons(&self) -> Result<Arc<Addons>> {
        self.catalog.load().context("Failed to load addons")
    }

    /// Read setup.json, reporting a missing or corrupted installation
    pub fn ensure_installed(&self) -> Result<SetupInfo> {
        SetupInfo::load(&self.config.setup_file()).map_err(|e| {
            match Failure::from_setup_error(&e) {
                Some(failure) => report_failure(failure),
                None => anyhow::Error::new(e).context("Failed to read setup status"),
            }
        })
    }

    /// Absolute path of a script in the installation directory
    pub fn script(&self, relative: &str) -> PathBuf {
        self.config.script_path(relative)
    }

    /// Parameters every script call receives
    pub fn base_params(&self) -> ScriptParams {
        ScriptParams::new().switch_if(SHOW_LOGS_PARAM, self.verbose > 0)
    }

    fn executor(&self, spinner: Option<ProgressBar>, suppress_output: bool) -> PsExecutor {
        let options = ExecOptions::default()
            .with_ps_version(PowerShellVersion::Desktop)
            .with_suppress_output(suppress_output)
            .with_cancellation(self.cancel.clone());

        PsExecutor::new(options).with_sink(Arc::new(TerminalSink::new(spinner)))
    }

    /// Run a lifecycle script reporting a `CmdResult`
    ///
    /// Script output is printed above a spinner showing `message`.
    pub async fn run_script(
        &self,
        script: &Path,
        params: ScriptParams,
        message: &str,
    ) -> Result<()> {
        let spinner = (!self.quiet).then(|| output::spinner(message));
        let executor = self.executor(spinner.clone(), self.quiet);

        let result: Result<CmdResult> = executor
            .execute_structured(
                &format_script_path(script),
                CMD_RESULT_MESSAGE_TYPE,
                &self.base_params().extend(params),
            )
            .await
            .with_context(|| format!("Failed to run {}", script.display()));

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        check_result(result?)
    }

    /// Run a script returning data, without spinner or log output
    pub async fn query<T: DeserializeOwned>(
        &self,
        script: &Path,
        message_type: &str,
        params: ScriptParams,
    ) -> Result<T> {
        self.executor(None, true)
            .execute_structured(&format_script_path(script), message_type, &params)
            .await
            .with_context(|| format!("Failed to run {}", script.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k2s_core::Severity;

    #[test]
    fn test_check_result_without_failure() {
        assert!(check_result(CmdResult::default()).is_ok());
    }

    #[test]
    fn test_check_result_with_failure() {
        let mut failure = Failure::new(Severity::Error, "addon-not-found", "no such addon");
        failure.suppress_cli_output = true;

        let err = check_result(CmdResult {
            failure: Some(failure),
        })
        .unwrap_err();

        let reported = err.downcast_ref::<ReportedFailure>().unwrap();
        assert_eq!(reported.0.code, "addon-not-found");
    }
}
