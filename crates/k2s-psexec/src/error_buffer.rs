//! Bounded buffer for stderr lines

use std::collections::VecDeque;
use tracing::warn;

/// Default number of stderr lines kept for error reporting
pub const DEFAULT_ERROR_LINE_LIMIT: usize = 100;

/// Keeps the most recent stderr lines up to a limit
///
/// Older lines are evicted one at a time and written to the log, so a failed
/// run reports the last `limit` lines.
#[derive(Debug)]
pub struct ErrorLineBuffer {
    limit: usize,
    lines: VecDeque<String>,
}

impl ErrorLineBuffer {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            lines: VecDeque::with_capacity(limit),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() >= self.limit {
            if let Some(evicted) = self.lines.pop_front() {
                warn!(target: "k2s_psexec::stderr", "{}", evicted);
            }
        }
        self.lines.push_back(line.into());
    }

    /// Buffered lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }
}

impl Default for ErrorLineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LINE_LIMIT)
    }
}
