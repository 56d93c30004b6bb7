//! Execution options

use crate::cancel::CancellationToken;
use crate::error_buffer::DEFAULT_ERROR_LINE_LIMIT;
use std::time::Duration;

/// PowerShell edition used to run scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerShellVersion {
    /// Windows PowerShell 5.1
    #[default]
    Desktop,

    /// PowerShell 7+
    Core,
}

impl PowerShellVersion {
    /// Executable name of the interpreter
    pub fn program(&self) -> &'static str {
        match self {
            PowerShellVersion::Desktop => "powershell",
            PowerShellVersion::Core => "pwsh",
        }
    }
}

impl std::fmt::Display for PowerShellVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Options of a script run
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub ps_version: PowerShellVersion,

    /// Route plain stdout lines to the debug log instead of the sink
    pub suppress_output: bool,

    /// Kill the script when it runs longer
    pub timeout: Option<Duration>,

    /// Kill the script when the token is cancelled
    pub cancel: Option<CancellationToken>,

    /// Number of stderr lines kept for error reporting
    pub error_line_limit: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            ps_version: PowerShellVersion::default(),
            suppress_output: false,
            timeout: None,
            cancel: None,
            error_line_limit: DEFAULT_ERROR_LINE_LIMIT,
        }
    }
}

impl ExecOptions {
    pub fn with_ps_version(mut self, ps_version: PowerShellVersion) -> Self {
        self.ps_version = ps_version;
        self
    }

    pub fn with_suppress_output(mut self, suppress_output: bool) -> Self {
        self.suppress_output = suppress_output;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_error_line_limit(mut self, limit: usize) -> Self {
        self.error_line_limit = limit;
        self
    }
}
