//! Script execution with structured results
//!
//! A run starts the interpreter, drains stdout and stderr concurrently and
//! feeds both into one consumer loop:
//!
//! - plain stdout lines go to the [`LogSink`]
//! - marker lines are decoded into [`StructuredMessage`]s
//! - stderr lines are buffered for the error report and forwarded to the sink
//!
//! The exit code is awaited once both streams are closed.

use crate::error::{PsError, Result};
use crate::error_buffer::ErrorLineBuffer;
use crate::marker::{decode_line, StructuredMessage};
use crate::options::ExecOptions;
use crate::params::ScriptParams;
use crate::process::{OutputStream, PowerShellLauncher, ProcessLauncher, ScriptProcess};
use crate::sink::{LogSink, TracingSink};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Parameter asking a script to emit its result as a marker line
pub const ENCODE_STRUCTURED_OUTPUT_PARAM: &str = "EncodeStructuredOutput";

/// Parameter naming the expected message type
pub const MESSAGE_TYPE_PARAM: &str = "MessageType";

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Output of a finished run
#[derive(Debug, Default)]
pub struct RunOutput {
    /// Structured messages in order of appearance
    pub messages: Vec<StructuredMessage>,
}

#[derive(Debug)]
enum StreamEvent {
    Stdout(String),
    Stderr(String),
    Failed(std::io::Error),
}

/// Runs PowerShell scripts
pub struct PsExecutor {
    launcher: Arc<dyn ProcessLauncher>,
    sink: Arc<dyn LogSink>,
    options: ExecOptions,
}

impl PsExecutor {
    /// Executor running the real interpreter and logging through tracing
    pub fn new(options: ExecOptions) -> Self {
        Self {
            launcher: Arc::new(PowerShellLauncher),
            sink: Arc::new(TracingSink),
            options,
        }
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Run a script that reports exactly one structured result
    ///
    /// `invocation` is the script call (e.g. `& 'C:\k\start.ps1'`); the
    /// structured-output parameters and `extra_params` are appended.
    pub async fn execute_structured<T: DeserializeOwned>(
        &self,
        invocation: &str,
        expected_type: &str,
        extra_params: &ScriptParams,
    ) -> Result<T> {
        let structured = ScriptParams::new()
            .switch(ENCODE_STRUCTURED_OUTPUT_PARAM)
            .string(MESSAGE_TYPE_PARAM, expected_type)
            .extend(extra_params.clone());

        let output = self.run(&build_command(invocation, &structured)).await?;

        let mut messages = output.messages;
        if messages.len() != 1 {
            return Err(PsError::UnexpectedDataCount {
                count: messages.len(),
            });
        }
        let message = messages.remove(0);

        if message.message_type() != expected_type {
            return Err(PsError::MessageTypeMismatch {
                expected: expected_type.to_string(),
                actual: message.message_type().to_string(),
            });
        }

        message.decode()
    }

    /// Run a script without a structured result
    pub async fn execute(&self, invocation: &str, extra_params: &ScriptParams) -> Result<()> {
        self.run(&build_command(invocation, extra_params)).await?;
        Ok(())
    }

    /// Run a command and collect its structured messages
    pub async fn run(&self, command: &str) -> Result<RunOutput> {
        debug!("Executing: {}", command);

        let mut process = self.launcher.launch(self.options.ps_version, command)?;
        let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = process.take_stdout() {
            readers.push(spawn_line_reader(stdout, tx.clone(), StreamEvent::Stdout));
        }
        if let Some(stderr) = process.take_stderr() {
            readers.push(spawn_line_reader(stderr, tx.clone(), StreamEvent::Stderr));
        }
        // The loop ends when both readers dropped their senders
        drop(tx);

        let deadline = self.options.timeout.map(|t| Instant::now() + t);
        let mut errors = ErrorLineBuffer::new(self.options.error_line_limit);
        let mut output = RunOutput::default();

        let result = loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.handle_event(event, &mut errors, &mut output) {
                            break Err(e);
                        }
                    }
                    None => break Ok(()),
                },
                interrupt = self.interrupted(deadline) => break Err(interrupt),
            }
        };

        let exit_code = match result {
            Ok(()) => tokio::select! {
                code = process.wait() => code.map_err(PsError::Io),
                interrupt = self.interrupted(deadline) => Err(interrupt),
            },
            Err(e) => Err(e),
        };

        let exit_code = match exit_code {
            Ok(code) => code,
            Err(e) => {
                debug!("Stopping script: {}", e);
                abort(&mut process, readers).await;
                return Err(e);
            }
        };

        debug!("Script exited with code {}", exit_code);
        if exit_code != 0 {
            return Err(PsError::NonZeroExit {
                code: exit_code,
                stderr: errors.into_lines(),
            });
        }

        Ok(output)
    }

    fn handle_event(
        &self,
        event: StreamEvent,
        errors: &mut ErrorLineBuffer,
        output: &mut RunOutput,
    ) -> Result<()> {
        match event {
            StreamEvent::Stdout(line) => match decode_line(&line)? {
                Some(message) => {
                    debug!("Received structured message '{}'", message.message_type());
                    output.messages.push(message);
                }
                None if self.options.suppress_output => debug!("{}", line),
                None => self.sink.log_line(&line),
            },
            StreamEvent::Stderr(line) => {
                self.sink.error_line(&line);
                errors.push(line);
            }
            StreamEvent::Failed(e) => return Err(PsError::Io(e)),
        }
        Ok(())
    }

    /// Resolves when the run is cancelled or its deadline passes
    async fn interrupted(&self, deadline: Option<Instant>) -> PsError {
        let cancelled = async {
            match &self.options.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let timed_out = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = cancelled => PsError::Cancelled,
            _ = timed_out => PsError::TimedOut(self.options.timeout.unwrap_or_default()),
        }
    }
}

/// Join invocation and parameters into a command line
fn build_command(invocation: &str, params: &ScriptParams) -> String {
    if params.is_empty() {
        invocation.to_string()
    } else {
        format!("{} {}", invocation, params)
    }
}

/// Strip the line terminator and decode the line
///
/// Windows PowerShell writes in the console codepage, so bytes that are not
/// valid UTF-8 are replaced instead of failing the run.
fn decode_output_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

fn spawn_line_reader(
    stream: OutputStream,
    tx: mpsc::Sender<StreamEvent>,
    wrap: fn(String) -> StreamEvent,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(wrap(decode_output_line(&buf))).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(StreamEvent::Failed(e)).await;
                    break;
                }
            }
        }
    })
}

async fn abort(process: &mut Box<dyn ScriptProcess>, readers: Vec<JoinHandle<()>>) {
    if let Err(e) = process.kill().await {
        debug!("Failed to kill script process: {}", e);
    }
    for reader in readers {
        reader.abort();
    }
}
