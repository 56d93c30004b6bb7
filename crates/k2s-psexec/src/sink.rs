//! Destinations for script log output

use tracing::{info, warn};

/// Receives plain output lines of a running script
pub trait LogSink: Send + Sync {
    /// A stdout line that is not a structured result
    fn log_line(&self, line: &str);

    /// A stderr line
    fn error_line(&self, line: &str);
}

/// Forwards script output to tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log_line(&self, line: &str) {
        info!(target: "k2s_psexec::stdout", "{}", line);
    }

    fn error_line(&self, line: &str) {
        warn!(target: "k2s_psexec::stderr", "{}", line);
    }
}
