//! Recording backend for tests.
//!
//! Answers queries with a scripted report, fails the commands that target
//! chosen outputs, and remembers every command it was given.  Lets session and
//! integration tests run without an X server.

use std::collections::HashMap;
use std::sync::Mutex;

use randr_core::RandrCommand;

use crate::application::dispatch::{BackendError, CommandOutput, DisplayBackend};

/// A scripted [`DisplayBackend`].
#[derive(Default)]
pub struct RecordingBackend {
    report: Mutex<String>,
    failures: Mutex<HashMap<String, String>>,
    unavailable: Mutex<bool>,
    executed: Mutex<Vec<RandrCommand>>,
}

impl RecordingBackend {
    /// Creates a backend whose query returns `report`.
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: Mutex::new(report.into()),
            ..Self::default()
        }
    }

    /// Replaces the query report, e.g. to simulate the effect of a command.
    pub fn set_report(&self, report: impl Into<String>) {
        *lock(&self.report) = report.into();
    }

    /// Makes every mutating command for `output` exit 1 with `stderr`.
    pub fn fail_output(&self, output: &str, stderr: &str) {
        lock(&self.failures).insert(output.to_string(), stderr.to_string());
    }

    /// Makes every command fail to spawn, as if the tool were not installed.
    pub fn make_unavailable(&self) {
        *lock(&self.unavailable) = true;
    }

    /// Every command received, in order.
    pub fn executed(&self) -> Vec<RandrCommand> {
        lock(&self.executed).clone()
    }

    /// Argument vectors of the mutating commands received, in order.
    pub fn mutations(&self) -> Vec<Vec<String>> {
        lock(&self.executed)
            .iter()
            .filter(|c| c.is_mutating())
            .map(RandrCommand::args)
            .collect()
    }
}

impl DisplayBackend for RecordingBackend {
    fn execute(&self, command: &RandrCommand) -> Result<CommandOutput, BackendError> {
        lock(&self.executed).push(command.clone());

        if *lock(&self.unavailable) {
            return Err(BackendError::Spawn {
                program: "xrandr".to_string(),
                message: "No such file or directory (os error 2)".to_string(),
            });
        }

        if !command.is_mutating() {
            return Ok(CommandOutput::success(lock(&self.report).clone()));
        }

        let failure = command
            .output()
            .and_then(|output| lock(&self.failures).get(output).cloned());
        Ok(match failure {
            Some(stderr) => CommandOutput::failure(1, stderr),
            None => CommandOutput::success(""),
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
