//! Dry-run backend.
//!
//! Queries still go to the real tool so the session sees the live layout, but
//! every mutating command is printed instead of run and reported as a
//! success.  Useful for checking what `apply` or `unlink` would do.

use std::io::Write;
use std::sync::{Arc, Mutex};

use randr_core::RandrCommand;
use tracing::info;

use super::command_line;
use crate::application::dispatch::{BackendError, CommandOutput, DisplayBackend};

/// Wraps another backend and intercepts mutating commands.
pub struct DryRunBackend {
    inner: Arc<dyn DisplayBackend>,
    program: String,
    issued: Mutex<Vec<String>>,
    echo: bool,
}

impl DryRunBackend {
    /// Intercepts commands for `program`, printing them to stdout.
    pub fn new(inner: Arc<dyn DisplayBackend>, program: impl Into<String>) -> Self {
        Self {
            inner,
            program: program.into(),
            issued: Mutex::new(Vec::new()),
            echo: true,
        }
    }

    /// Like [`new`](Self::new) but only records, without printing.
    pub fn silent(inner: Arc<dyn DisplayBackend>, program: impl Into<String>) -> Self {
        Self {
            echo: false,
            ..Self::new(inner, program)
        }
    }

    /// Every intercepted command line, in order.
    pub fn issued(&self) -> Vec<String> {
        self.issued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DisplayBackend for DryRunBackend {
    fn execute(&self, command: &RandrCommand) -> Result<CommandOutput, BackendError> {
        if !command.is_mutating() {
            return self.inner.execute(command);
        }

        let line = command_line(&self.program, command);
        info!("dry run: {line}");
        if self.echo {
            let mut stdout = std::io::stdout().lock();
            // A closed stdout must not turn a dry run into a failure.
            let _ = writeln!(stdout, "[dry-run] {line}");
        }
        self.issued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
        Ok(CommandOutput::success(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::backend::mock::RecordingBackend;

    #[test]
    fn test_query_passes_through_to_inner_backend() {
        // Arrange
        let inner = Arc::new(RecordingBackend::new("HDMI-1 connected 1920x1080+0+0\n"));
        let dry = DryRunBackend::silent(inner.clone(), "xrandr");

        // Act
        let output = dry.execute(&RandrCommand::Query).expect("query");

        // Assert
        assert_eq!(output.stdout, "HDMI-1 connected 1920x1080+0+0\n");
        assert_eq!(inner.executed(), vec![RandrCommand::Query]);
        assert!(dry.issued().is_empty());
    }

    #[test]
    fn test_mutating_commands_are_recorded_not_executed() {
        let inner = Arc::new(RecordingBackend::new(""));
        let dry = DryRunBackend::silent(inner.clone(), "xrandr");
        let command = RandrCommand::PlaceAtOrigin {
            output: "eDP-1".to_string(),
        };

        let output = dry.execute(&command).expect("dry run never fails");

        assert!(output.is_success());
        assert!(inner.executed().is_empty());
        assert_eq!(dry.issued(), vec!["xrandr --output eDP-1 --pos 0x0"]);
    }
}
