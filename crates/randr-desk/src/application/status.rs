//! Status channel abstraction.
//!
//! The session never prints.  It reports progress through a [`StatusSink`]:
//! `status` replaces the single current status line, `error` raises an error
//! the user must notice.  The terminal front-end prints both; tests record
//! them.

/// Receives user-facing status and error messages.
pub trait StatusSink: Send + Sync {
    /// Replaces the current status line.
    fn status(&self, message: &str);

    /// Reports an error.  Implementations should also make it the current status.
    fn error(&self, message: &str);
}
