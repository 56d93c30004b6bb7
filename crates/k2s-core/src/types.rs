//! Result types exchanged with the PowerShell scripts

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Message type of [`CmdResult`] payloads
pub const CMD_RESULT_MESSAGE_TYPE: &str = "CmdResult";

/// Failure severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A failure reported by a script or derived from a sentinel error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub severity: Severity,

    pub code: String,

    pub message: String,

    /// The failure was already printed by the script
    #[serde(default)]
    pub suppress_cli_output: bool,
}

impl Failure {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            suppress_cli_output: false,
        }
    }

    /// Map the setup-state sentinels to user-facing warnings
    pub fn from_setup_error(err: &Error) -> Option<Self> {
        match err {
            Error::SystemNotInstalled => Some(Self::new(
                Severity::Warning,
                err.to_string(),
                "You cannot perform this operation because K2s is not installed",
            )),
            Error::SystemInCorruptedState => Some(Self::new(
                Severity::Warning,
                err.to_string(),
                "K2s is in a corrupted state, uninstall and install again",
            )),
            _ => None,
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// Generic result of a lifecycle script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdResult {
    #[serde(default)]
    pub failure: Option<Failure>,
}
