//! Common test helpers for k2s-psexec integration tests
//!
//! - Stub launcher producing in-memory script processes
//! - Recording log sink

use async_trait::async_trait;
use k2s_psexec::{
    LogSink, OutputStream, PowerShellVersion, ProcessLauncher, PsError, ScriptProcess,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::DuplexStream;

// ─── Process stubs ───────────────────────────────────────────────────────────

/// What a stub process writes and how it exits
#[derive(Debug, Clone, Default)]
pub struct StubScript {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    /// Bytes written before the stdout lines
    pub raw_stdout: Vec<u8>,
    /// Bytes written before the stderr lines
    pub raw_stderr: Vec<u8>,
    pub exit_code: i32,
    /// Keep stdout open until the process is killed
    pub hang: bool,
}

impl StubScript {
    pub fn stdout(lines: &[&str]) -> Self {
        Self {
            stdout: lines.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_stderr(mut self, lines: &[&str]) -> Self {
        self.stderr = lines.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Prepend undecoded bytes, e.g. console codepage output
    pub fn with_raw_output(mut self, stdout: &[u8], stderr: &[u8]) -> Self {
        self.raw_stdout = stdout.to_vec();
        self.raw_stderr = stderr.to_vec();
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Default::default()
        }
    }
}

fn stream(raw: &[u8], lines: &[String]) -> OutputStream {
    let mut content = raw.to_vec();
    for line in lines {
        content.extend_from_slice(line.as_bytes());
        content.push(b'\n');
    }
    Box::new(Cursor::new(content))
}

pub struct StubProcess {
    stdout: Option<OutputStream>,
    stderr: Option<OutputStream>,
    exit_code: i32,
    killed: Arc<AtomicBool>,
    // Writer halves of hanging streams
    open: Vec<DuplexStream>,
}

#[async_trait]
impl ScriptProcess for StubProcess {
    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout.take()
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr.take()
    }

    async fn wait(&mut self) -> std::io::Result<i32> {
        Ok(self.exit_code)
    }

    async fn kill(&mut self) -> std::io::Result<()> {
        self.killed.store(true, Ordering::SeqCst);
        self.open.clear();
        Ok(())
    }
}

/// Launcher recording commands and starting stub processes
#[derive(Clone, Default)]
pub struct StubLauncher {
    pub script: StubScript,
    pub commands: Arc<Mutex<Vec<String>>>,
    pub killed: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl StubLauncher {
    pub fn new(script: StubScript) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn was_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }
}

impl ProcessLauncher for StubLauncher {
    fn launch(
        &self,
        _ps_version: PowerShellVersion,
        command: &str,
    ) -> Result<Box<dyn ScriptProcess>, PsError> {
        self.commands.lock().unwrap().push(command.to_string());

        let mut open = Vec::new();
        let stdout: OutputStream = if self.script.hang {
            let (reader, writer) = tokio::io::duplex(64);
            open.push(writer);
            Box::new(reader)
        } else {
            stream(&self.script.raw_stdout, &self.script.stdout)
        };

        Ok(Box::new(StubProcess {
            stdout: Some(stdout),
            stderr: Some(stream(&self.script.raw_stderr, &self.script.stderr)),
            exit_code: self.script.exit_code,
            killed: Arc::clone(&self.killed),
            open,
        }))
    }
}

// ─── Sink ────────────────────────────────────────────────────────────────────

/// Sink keeping every line it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub logs: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn log_line(&self, line: &str) {
        self.logs.lock().unwrap().push(line.to_string());
    }

    fn error_line(&self, line: &str) {
        self.errors.lock().unwrap().push(line.to_string());
    }
}
