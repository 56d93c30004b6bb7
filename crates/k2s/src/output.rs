//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use k2s_core::{Failure, Severity};
use k2s_psexec::LogSink;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print a script failure with its severity
pub fn failure(failure: &Failure) {
    match failure.severity {
        Severity::Warning => warning(&failure.message),
        Severity::Error => error(&failure.message),
    }
}

/// Print a value as pretty JSON
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.blue} {msg} [{elapsed}]") {
        pb.set_style(template.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Prints script output above a running spinner
pub struct TerminalSink {
    spinner: Option<ProgressBar>,
}

impl TerminalSink {
    pub fn new(spinner: Option<ProgressBar>) -> Self {
        Self { spinner }
    }

    fn print(&self, line: String) {
        match &self.spinner {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl LogSink for TerminalSink {
    fn log_line(&self, line: &str) {
        self.print(format!("{}", style(line).dim()));
    }

    fn error_line(&self, line: &str) {
        self.print(format!("{}", style(line).red()));
    }
}
