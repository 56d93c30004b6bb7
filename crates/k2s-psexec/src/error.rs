//! Error types for k2s-psexec

use thiserror::Error;

/// Result type alias using k2s-psexec's error type
pub type Result<T> = std::result::Result<T, PsError>;

/// Script execution errors
#[derive(Error, Debug)]
pub enum PsError {
    /// The interpreter could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the output streams or waiting for the process failed
    #[error("I/O error while running script: {0}")]
    Io(#[from] std::io::Error),

    /// A marker line did not split into the expected fields
    #[error("malformed structured output line: expected 4 fields, got {fields}")]
    MalformedMarker { fields: usize },

    /// The payload is not valid base64
    #[error("failed to decode structured output: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not valid gzip
    #[error("failed to decompress structured output: {0}")]
    Gzip(#[source] std::io::Error),

    /// The script exited with a non-zero code
    #[error("script exited with code {code}{}", format_stderr(.stderr))]
    NonZeroExit { code: i32, stderr: Vec<String> },

    /// The script did not report exactly one structured result
    #[error("unexpected number of data objects: {count}")]
    UnexpectedDataCount { count: usize },

    /// The structured result has the wrong message type
    #[error("unexpected message type: expected '{expected}', got '{actual}'")]
    MessageTypeMismatch { expected: String, actual: String },

    /// The structured result does not match the expected shape
    #[error("failed to unmarshal '{message_type}' result: {source}")]
    Unmarshal {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// Execution was cancelled
    #[error("script execution cancelled")]
    Cancelled,

    /// Execution exceeded its timeout
    #[error("script execution timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

fn format_stderr(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!(":\n{}", lines.join("\n"))
    }
}
