//! Child process abstraction
//!
//! The executor drives a [`ScriptProcess`] started by a [`ProcessLauncher`].
//! [`PowerShellLauncher`] starts the real interpreter; tests plug in
//! in-memory processes.

use crate::error::{PsError, Result};
use crate::options::PowerShellVersion;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tracing::debug;

/// A readable output stream of a process
pub type OutputStream = Box<dyn AsyncRead + Send + Unpin>;

/// A started script process
#[async_trait]
pub trait ScriptProcess: Send {
    /// Take the stdout stream; `None` once taken
    fn take_stdout(&mut self) -> Option<OutputStream>;

    /// Take the stderr stream; `None` once taken
    fn take_stderr(&mut self) -> Option<OutputStream>;

    /// Wait for the process to exit and return its exit code
    async fn wait(&mut self) -> std::io::Result<i32>;

    /// Terminate the process
    async fn kill(&mut self) -> std::io::Result<()>;
}

/// Starts script processes
pub trait ProcessLauncher: Send + Sync {
    /// Run `command` with the given PowerShell edition
    fn launch(
        &self,
        ps_version: PowerShellVersion,
        command: &str,
    ) -> Result<Box<dyn ScriptProcess>>;
}

/// Launches `powershell` / `pwsh`
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShellLauncher;

impl PowerShellLauncher {
    /// Arguments passed to the interpreter
    pub fn args(command: &str) -> Vec<String> {
        [
            "-NoLogo",
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            command,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl ProcessLauncher for PowerShellLauncher {
    fn launch(
        &self,
        ps_version: PowerShellVersion,
        command: &str,
    ) -> Result<Box<dyn ScriptProcess>> {
        let program = ps_version.program();
        let spawn_err = |source| PsError::Spawn {
            program: program.to_string(),
            source,
        };

        let executable = which::which(program).map_err(|e| {
            spawn_err(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))
        })?;
        debug!("Running {:?} -Command {}", executable, command);

        let child = Command::new(executable)
            .args(Self::args(command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        Ok(Box::new(ChildProcess { child }))
    }
}

/// A tokio child process
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
}

#[async_trait]
impl ScriptProcess for ChildProcess {
    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as OutputStream)
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as OutputStream)
    }

    async fn wait(&mut self) -> std::io::Result<i32> {
        let status = self.child.wait().await?;
        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }

    async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }
}
