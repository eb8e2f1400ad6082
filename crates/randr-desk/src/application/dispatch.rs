//! Command dispatch: runs [`RandrCommand`]s and interprets the result.
//!
//! # Exit status rules
//!
//! | Backend result                  | Dispatch result                                   |
//! |---------------------------------|---------------------------------------------------|
//! | exit code 0                     | `Ok(CommandOutput)`                               |
//! | non-zero exit, stderr non-empty | `Err(Failed { diagnostic: stderr.trim() })`       |
//! | non-zero exit, stderr empty     | `Err(Failed { diagnostic: "Unknown error" })`     |
//! | process could not be spawned    | `Err(Backend(..))` carrying the OS error text     |
//!
//! Only the query command's stdout is ever read.  For mutating commands the
//! exit code and stderr are all that matter.
//!
//! Execution is synchronous: [`DisplayBackend::execute`] blocks until the
//! process exits.

use randr_core::{parse_query_output, Monitor, RandrCommand};
use thiserror::Error;
use tracing::{debug, warn};

/// Diagnostic used when a command fails without writing to stderr.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The process could not be run at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Spawning `program` failed (missing executable, permission denied, ...).
    #[error("could not run {program}: {message}")]
    Spawn { program: String, message: String },
}

/// Why a dispatched command did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The command ran and exited non-zero.
    #[error("{diagnostic}")]
    Failed { diagnostic: String },

    /// The command could not be run.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl DispatchError {
    /// The text shown to the user after `xrandr failed: `.
    pub fn diagnostic(&self) -> String {
        self.to_string()
    }
}

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run that printed `stdout`.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A run that exited with `code` and printed `stderr`.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes display-tool commands.
///
/// The production implementation spawns `xrandr`; tests use hand-written or
/// `mockall`-generated doubles.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayBackend: Send + Sync {
    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Spawn`] only when the process could not be
    /// started.  A non-zero exit is *not* an error at this level.
    fn execute(&self, command: &RandrCommand) -> Result<CommandOutput, BackendError>;
}

/// Runs one command and maps a non-zero exit to [`DispatchError::Failed`].
///
/// # Errors
///
/// See the module-level table.
pub fn run_command(
    backend: &dyn DisplayBackend,
    command: &RandrCommand,
) -> Result<CommandOutput, DispatchError> {
    debug!("dispatching {:?}", command.args());
    let output = backend.execute(command).map_err(|e| {
        warn!("{}: {e}", command.describe());
        DispatchError::from(e)
    })?;

    if output.is_success() {
        return Ok(output);
    }

    let trimmed = output.stderr.trim();
    let diagnostic = if trimmed.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        trimmed.to_string()
    };
    warn!(
        "{} exited with {:?}: {diagnostic}",
        command.describe(),
        output.code
    );
    Err(DispatchError::Failed { diagnostic })
}

/// Runs the query command and parses its report.
///
/// # Errors
///
/// Returns the dispatch error if the query could not run or exited non-zero.
pub fn query_monitors(backend: &dyn DisplayBackend) -> Result<Vec<Monitor>, DispatchError> {
    let output = run_command(backend, &RandrCommand::Query)?;
    Ok(parse_query_output(&output.stdout))
}

// ── Batches ───────────────────────────────────────────────────────────────────

/// Outcome of one command within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub command: RandrCommand,
    pub result: Result<(), DispatchError>,
}

impl BatchItem {
    /// The output the command reconfigured.
    pub fn output(&self) -> &str {
        self.command.output().unwrap_or_default()
    }
}

/// Per-command outcomes of a batch, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn attempted(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    /// Failed items with their error.
    pub fn failures(&self) -> impl Iterator<Item = (&BatchItem, &DispatchError)> {
        self.items
            .iter()
            .filter_map(|i| i.result.as_ref().err().map(|e| (i, e)))
    }
}

/// Runs every command in order.  A failure does not stop the batch.
pub fn run_batch(backend: &dyn DisplayBackend, commands: Vec<RandrCommand>) -> BatchReport {
    let items = commands
        .into_iter()
        .map(|command| {
            let result = run_command(backend, &command).map(|_| ());
            BatchItem { command, result }
        })
        .collect();
    BatchReport { items }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
