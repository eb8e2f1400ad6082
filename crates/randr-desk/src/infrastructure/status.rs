//! [`StatusSink`] implementations.
//!
//! - [`ConsoleStatus`] prints status lines to stdout and errors to stderr.
//! - [`MemoryStatus`] keeps the current status and a history, for tests and
//!   for front-ends that redraw the status line themselves.

use std::io::Write;
use std::sync::Mutex;

use tracing::error;

use crate::application::status::StatusSink;

/// Prints every message as it arrives.
#[derive(Debug, Default)]
pub struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn status(&self, message: &str) {
        let _ = writeln!(std::io::stdout().lock(), "{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
        let _ = writeln!(std::io::stderr().lock(), "Error: {message}");
    }
}

/// Whether a recorded message came through `status` or `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// Records messages in memory.
#[derive(Debug, Default)]
pub struct MemoryStatus {
    history: Mutex<Vec<StatusMessage>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current status line: the most recent message of either kind.
    pub fn current(&self) -> Option<String> {
        self.lock().last().map(|m| m.text.clone())
    }

    /// Texts of every message, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.lock().iter().map(|m| m.text.clone()).collect()
    }

    /// Texts of the error messages only.
    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|m| m.kind == StatusKind::Error)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StatusMessage>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, kind: StatusKind, text: &str) {
        self.lock().push(StatusMessage {
            kind,
            text: text.to_string(),
        });
    }
}

impl StatusSink for MemoryStatus {
    fn status(&self, message: &str) {
        self.push(StatusKind::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(StatusKind::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_status_current_is_latest_message() {
        let sink = MemoryStatus::new();
        sink.status("first");
        sink.error("second");
        assert_eq!(sink.current().as_deref(), Some("second"));
        assert_eq!(sink.texts(), vec!["first", "second"]);
        assert_eq!(sink.errors(), vec!["second"]);
    }

    #[test]
    fn test_memory_status_clear_forgets_history() {
        let sink = MemoryStatus::new();
        sink.status("x");
        sink.clear();
        assert_eq!(sink.current(), None);
    }
}
