//! PowerShell script execution for the K2s CLI
//!
//! Scripts log plain text on stdout and report their result as a single
//! marker line (`#pm#<type>#<base64(gzip(json))>`). [`PsExecutor`] streams
//! the log lines while the script runs and decodes the result once it exits.
//!
//! ```no_run
//! use k2s_psexec::{ExecOptions, PsExecutor, ScriptParams};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CmdResult {
//!     failure: Option<serde_json::Value>,
//! }
//!
//! # async fn run() -> k2s_psexec::Result<()> {
//! let executor = PsExecutor::new(ExecOptions::default());
//! let result: CmdResult = executor
//!     .execute_structured("& 'C:\\k\\start.ps1'", "CmdResult", &ScriptParams::new())
//!     .await?;
//! assert!(result.failure.is_none());
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod error;
pub mod error_buffer;
pub mod executor;
pub mod marker;
pub mod options;
pub mod params;
pub mod process;
pub mod sink;

pub use cancel::CancellationToken;
pub use error::{PsError, Result};
pub use error_buffer::ErrorLineBuffer;
pub use executor::{PsExecutor, RunOutput};
pub use marker::{decode_line, encode_message, StructuredMessage, MARKER_PREFIX};
pub use options::{ExecOptions, PowerShellVersion};
pub use params::{format_script_path, quote, ScriptParams};
pub use process::{OutputStream, PowerShellLauncher, ProcessLauncher, ScriptProcess};
pub use sink::{LogSink, TracingSink};
