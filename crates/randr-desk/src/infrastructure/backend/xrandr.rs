//! Process backend: runs the display tool and captures its output.

use std::process::Command;

use randr_core::RandrCommand;
use tracing::trace;

use crate::application::dispatch::{BackendError, CommandOutput, DisplayBackend};

/// Default program name.
pub const DEFAULT_PROGRAM: &str = "xrandr";

/// Runs `program` (normally `xrandr`) once per command and waits for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrandrBackend {
    program: String,
}

impl XrandrBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for XrandrBackend {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl DisplayBackend for XrandrBackend {
    fn execute(&self, command: &RandrCommand) -> Result<CommandOutput, BackendError> {
        let output = Command::new(&self.program)
            .args(command.args())
            .output()
            .map_err(|e| BackendError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!(
            "{} exited with {:?} ({} bytes stdout)",
            self.program,
            result.code,
            result.stdout.len()
        );
        Ok(result)
    }
}
