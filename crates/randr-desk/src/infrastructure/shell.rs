//! Interactive line-oriented shell.
//!
//! Stands in for the drag-and-drop window: each line is one user gesture
//! (`click`, `drop`, `apply`, ...), applied to a [`LayoutSession`].
//!
//! # Deferred refresh (for beginners)
//!
//! After a successful action the session asks for a refresh "in 1000 ms" (or
//! 500 ms after a batch).  The shell keeps one [`RefreshTimer`] and waits on
//! *both* the next input line and the timer with `tokio::select!`, so the
//! prompt stays usable while the timer runs and the refresh happens even if
//! the user types nothing.
//!
//! Backend calls themselves are synchronous and block the shell while xrandr
//! runs.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use randr_core::{DropOutcome, ExtendSide};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::application::session::{LayoutSession, SessionError};
use crate::infrastructure::ui_bridge::{
    monitor_dtos, render_canvas, render_choices, render_monitor_table, render_pending, tile_views,
};

pub const PROMPT: &str = "randr> ";

pub const HELP: &str = "\
Commands:
  list                  show monitors and canvas tiles
  click NAME            toggle NAME as source / target
  clear                 clear the selection
  drop NAME X Y         drop NAME's tile at canvas position X,Y
  pending               show unapplied layout changes
  apply                 apply pending layout changes
  unlink                break every mirror, monitors left to right
  mirror                mirror source onto target
  extend-right          extend target to the right of source
  extend-left           extend target to the left of source
  mode [WxH]            show or choose the resolution
  rate [RATE]           show or choose the refresh rate
  refresh               clear the selection and re-read the layout
  help                  show this help
  quit                  leave the shell
";

// ── Command parsing ───────────────────────────────────────────────────────────

/// Errors for malformed shell lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellParseError {
    #[error("unknown command: {0} (type `help` for a list)")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: {argument} must be an integer, got {value:?}")]
    InvalidNumber {
        command: &'static str,
        argument: &'static str,
        value: String,
    },

    #[error("{command}: unexpected argument {value:?}")]
    UnexpectedArgument { command: &'static str, value: String },
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Click(String),
    Clear,
    Drop { name: String, x: i32, y: i32 },
    Pending,
    Apply,
    Unlink,
    Mirror,
    Extend(ExtendSide),
    Mode(Option<String>),
    Rate(Option<String>),
    Refresh,
    Help,
    Quit,
}

struct Args<'a> {
    command: &'static str,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn required(&mut self, argument: &'static str) -> Result<&'a str, ShellParseError> {
        self.tokens.next().ok_or(ShellParseError::MissingArgument {
            command: self.command,
            argument,
        })
    }

    fn optional(&mut self) -> Option<String> {
        self.tokens.next().map(str::to_string)
    }

    fn integer(&mut self, argument: &'static str) -> Result<i32, ShellParseError> {
        let value = self.required(argument)?;
        value.parse().map_err(|_| ShellParseError::InvalidNumber {
            command: self.command,
            argument,
            value: value.to_string(),
        })
    }

    fn finish<T>(mut self, parsed: T) -> Result<Option<T>, ShellParseError> {
        match self.tokens.next() {
            Some(extra) => Err(ShellParseError::UnexpectedArgument {
                command: self.command,
                value: extra.to_string(),
            }),
            None => Ok(Some(parsed)),
        }
    }
}

impl ShellCommand {
    /// Parses one input line.  Blank lines and `#` comments yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellParseError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Option<ShellCommand>, ShellParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut tokens = line.split_whitespace();
        let word = tokens.next().unwrap_or_default().to_ascii_lowercase();
        let command: &'static str = match word.as_str() {
            "list" | "ls" => "list",
            "click" => "click",
            "clear" => "clear",
            "drop" => "drop",
            "pending" => "pending",
            "apply" => "apply",
            "unlink" => "unlink",
            "mirror" => "mirror",
            "extend-right" => "extend-right",
            "extend-left" => "extend-left",
            "mode" => "mode",
            "rate" => "rate",
            "refresh" => "refresh",
            "help" | "?" => "help",
            "quit" | "exit" | "q" => "quit",
            _ => return Err(ShellParseError::UnknownCommand(word)),
        };
        let mut args = Args { command, tokens };

        match command {
            "list" => args.finish(ShellCommand::List),
            "click" => {
                let name = args.required("NAME")?.to_string();
                args.finish(ShellCommand::Click(name))
            }
            "clear" => args.finish(ShellCommand::Clear),
            "drop" => {
                let name = args.required("NAME")?.to_string();
                let x = args.integer("X")?;
                let y = args.integer("Y")?;
                args.finish(ShellCommand::Drop { name, x, y })
            }
            "pending" => args.finish(ShellCommand::Pending),
            "apply" => args.finish(ShellCommand::Apply),
            "unlink" => args.finish(ShellCommand::Unlink),
            "mirror" => args.finish(ShellCommand::Mirror),
            "extend-right" => args.finish(ShellCommand::Extend(ExtendSide::Right)),
            "extend-left" => args.finish(ShellCommand::Extend(ExtendSide::Left)),
            "mode" => {
                let mode = args.optional();
                args.finish(ShellCommand::Mode(mode))
            }
            "rate" => {
                let rate = args.optional();
                args.finish(ShellCommand::Rate(rate))
            }
            "refresh" => args.finish(ShellCommand::Refresh),
            "help" => args.finish(ShellCommand::Help),
            _ => args.finish(ShellCommand::Quit),
        }
    }
}

// ── Refresh timer ─────────────────────────────────────────────────────────────

/// A single re-armable deadline for the deferred refresh.
#[derive(Debug, Default)]
pub struct RefreshTimer {
    deadline: Option<Instant>,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `delay` from now, replacing any earlier deadline.
    pub fn arm(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Completes at the deadline.  Never completes while disarmed.
    pub fn fired(&self) -> impl Future<Output = ()> + 'static {
        let deadline = self.deadline;
        async move {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        }
    }
}

// ── Shell loop ────────────────────────────────────────────────────────────────

/// Runs the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns I/O errors from reading `input` or writing `out`.
pub async fn run_shell<R, W>(session: &mut LayoutSession, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut timer = RefreshTimer::new();
    prompt(out)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match ShellCommand::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => execute(session, command, out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
                prompt(out)?;
            }
            () = timer.fired() => {
                timer.disarm();
                debug!("running deferred refresh");
                session.refresh();
            }
        }

        if let Some(delay) = session.take_scheduled_refresh() {
            debug!("refresh scheduled in {delay:?}");
            timer.arm(delay);
        }
    }

    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()
}

/// Applies one parsed command to the session.
///
/// Errors the session already reported on the status channel are not
/// printed a second time.
pub fn execute<W: Write>(
    session: &mut LayoutSession,
    command: ShellCommand,
    out: &mut W,
) -> std::io::Result<()> {
    let result = match command {
        ShellCommand::List => {
            write!(out, "{}", render_monitor_table(&monitor_dtos(session)))?;
            write!(
                out,
                "{}",
                render_canvas(&tile_views(session), session.scene().scale())
            )?;
            Ok(())
        }
        ShellCommand::Click(name) => session.click(&name).map(|_| ()),
        ShellCommand::Clear => {
            session.clear_selection();
            Ok(())
        }
        ShellCommand::Drop { name, x, y } => match session.drop_tile(&name, x, y) {
            Ok(DropOutcome::Stayed) => {
                writeln!(out, "{name} dropped at ({x}, {y})")?;
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        },
        ShellCommand::Pending => {
            write!(out, "{}", render_pending(session.pending()))?;
            Ok(())
        }
        ShellCommand::Apply => session.apply_pending().map(|_| ()),
        ShellCommand::Unlink => session.unlink().map(|_| ()),
        ShellCommand::Mirror => session.mirror(),
        ShellCommand::Extend(side) => session.extend(side),
        ShellCommand::Mode(None) | ShellCommand::Rate(None) => {
            write!(out, "{}", render_choices(session))?;
            Ok(())
        }
        ShellCommand::Mode(Some(mode)) => match session.set_mode(&mode) {
            Ok(()) => {
                writeln!(out, "Mode set to {mode}")?;
                Ok(())
            }
            Err(e) => Err(e),
        },
        ShellCommand::Rate(Some(rate)) => match session.set_rate(&rate) {
            Ok(()) => {
                writeln!(out, "Rate set to {rate}")?;
                Ok(())
            }
            Err(e) => Err(e),
        },
        ShellCommand::Refresh => {
            session.clear_selection();
            session.refresh();
            Ok(())
        }
        ShellCommand::Help => {
            write!(out, "{HELP}")?;
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    };

    match result {
        Err(
            SessionError::Dispatch(_)
            | SessionError::NothingMirrored
            | SessionError::IncompleteSelection,
        ) => Ok(()),
        Err(e) => writeln!(out, "{e}"),
        Ok(()) => Ok(()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::session::SessionSettings;
    use crate::infrastructure::backend::mock::RecordingBackend;
    use crate::infrastructure::status::MemoryStatus;
    use randr_core::{RandrCommand, SnapEngine};
    use tokio::io::{AsyncWriteExt, BufReader};

    const TWO_SIDE_BY_SIDE: &str = "\
HDMI-1 connected primary 1920x1080+0+0 (normal) 527mm x 296mm
   1920x1080     60.00*+
   1280x720      59.94
DP-1 connected 1920x1080+1920+0 (normal) 527mm x 296mm
   1920x1080     60.00*+
";

    fn session_over(backend: Arc<RecordingBackend>) -> (LayoutSession, Arc<MemoryStatus>) {
        let status = Arc::new(MemoryStatus::new());
        let mut session = LayoutSession::new(
            backend,
            status.clone(),
            SnapEngine::default(),
            SessionSettings::default(),
        );
        session.refresh();
        (session, status)
    }

    fn query_count(backend: &RecordingBackend) -> usize {
        backend
            .executed()
            .iter()
            .filter(|c| **c == RandrCommand::Query)
            .count()
    }

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ShellCommand::parse("list"), Ok(Some(ShellCommand::List)));
        assert_eq!(ShellCommand::parse("  APPLY  "), Ok(Some(ShellCommand::Apply)));
        assert_eq!(
            ShellCommand::parse("extend-left"),
            Ok(Some(ShellCommand::Extend(ExtendSide::Left)))
        );
        assert_eq!(ShellCommand::parse("exit"), Ok(Some(ShellCommand::Quit)));
    }

    #[test]
    fn test_parse_blank_and_comment_lines_are_skipped() {
        assert_eq!(ShellCommand::parse(""), Ok(None));
        assert_eq!(ShellCommand::parse("   "), Ok(None));
        assert_eq!(ShellCommand::parse("# arrange monitors"), Ok(None));
    }

    #[test]
    fn test_parse_drop_with_negative_coordinates() {
        assert_eq!(
            ShellCommand::parse("drop DP-1 -40 200"),
            Ok(Some(ShellCommand::Drop {
                name: "DP-1".to_string(),
                x: -40,
                y: 200
            }))
        );
    }

    #[test]
    fn test_parse_drop_reports_bad_number() {
        assert_eq!(
            ShellCommand::parse("drop DP-1 left 200"),
            Err(ShellParseError::InvalidNumber {
                command: "drop",
                argument: "X",
                value: "left".to_string()
            })
        );
    }

    #[test]
    fn test_parse_missing_and_extra_arguments() {
        assert_eq!(
            ShellCommand::parse("click"),
            Err(ShellParseError::MissingArgument {
                command: "click",
                argument: "NAME"
            })
        );
        assert_eq!(
            ShellCommand::parse("apply now"),
            Err(ShellParseError::UnexpectedArgument {
                command: "apply",
                value: "now".to_string()
            })
        );
    }

    #[test]
    fn test_parse_mode_and_rate_take_optional_value() {
        assert_eq!(ShellCommand::parse("mode"), Ok(Some(ShellCommand::Mode(None))));
        assert_eq!(
            ShellCommand::parse("rate 59.94"),
            Ok(Some(ShellCommand::Rate(Some("59.94".to_string()))))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            ShellCommand::parse("rotate DP-1"),
            Err(ShellParseError::UnknownCommand("rotate".to_string()))
        );
    }

    // ── timer ─────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_refresh_timer_fires_after_delay() {
        // Arrange
        let mut timer = RefreshTimer::new();
        let start = Instant::now();

        // Act
        timer.arm(Duration::from_millis(1000));
        timer.fired().await;

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_timer_never_fires() {
        let mut timer = RefreshTimer::new();
        timer.arm(Duration::from_millis(10));
        timer.disarm();

        let waited = tokio::time::timeout(Duration::from_secs(60), timer.fired()).await;

        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_replaces_earlier_deadline() {
        let mut timer = RefreshTimer::new();
        let start = Instant::now();
        timer.arm(Duration::from_millis(500));
        timer.arm(Duration::from_millis(1000));

        timer.fired().await;

        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    // ── run_shell ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_shell_runs_script_and_stops_at_quit() {
        // Arrange
        let backend = Arc::new(RecordingBackend::new(TWO_SIDE_BY_SIDE));
        let (mut session, status) = session_over(backend.clone());
        let script: &[u8] = b"click HDMI-1\nclick DP-1\nextend-right\nquit\nmirror\n";
        let mut out = Vec::new();

        // Act
        run_shell(&mut session, script, &mut out).await.expect("shell io");

        // Assert: mirror after quit never ran
        assert_eq!(
            backend.mutations(),
            vec![vec![
                "--auto", "--output", "DP-1", "--mode", "1920x1080", "--rate", "60.00",
                "--right-of", "HDMI-1"
            ]]
        );
        assert_eq!(
            status.current().as_deref(),
            Some("Extending DP-1 to the right of HDMI-1 - Success!")
        );
    }

    #[tokio::test]
    async fn test_shell_prints_parse_and_validation_errors() {
        let backend = Arc::new(RecordingBackend::new(TWO_SIDE_BY_SIDE));
        let (mut session, _) = session_over(backend);
        let script: &[u8] = b"frobnicate\nclick VGA-1\nrate 75\n";
        let mut out = Vec::new();

        run_shell(&mut session, script, &mut out).await.expect("shell io");

        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("unknown command: frobnicate"));
        assert!(text.contains("unknown monitor: VGA-1"));
        assert!(text.contains("unsupported refresh rate 75"));
    }

    #[tokio::test]
    async fn test_shell_drop_then_apply_issues_reposition() {
        let backend = Arc::new(RecordingBackend::new(TWO_SIDE_BY_SIDE));
        let (mut session, _) = session_over(backend.clone());
        let script: &[u8] = b"drop DP-1 25 200\npending\napply\n";
        let mut out = Vec::new();

        run_shell(&mut session, script, &mut out).await.expect("shell io");

        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("1. DP-1 below HDMI-1"));
        assert_eq!(
            backend.mutations(),
            vec![vec!["--output", "DP-1", "--below", "HDMI-1"]]
        );
    }

    #[test]
    fn test_parse_drop_rejects_coordinates_outside_i32() {
        assert_eq!(
            ShellCommand::parse("drop DP-1 0 99999999999"),
            Err(ShellParseError::InvalidNumber {
                command: "drop",
                argument: "Y",
                value: "99999999999".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_shell_survives_drops_at_coordinate_extremes() {
        // Arrange
        let backend = Arc::new(RecordingBackend::new(TWO_SIDE_BY_SIDE));
        let (mut session, status) = session_over(backend);
        let script: &[u8] = b"drop DP-1 -2147483648 0\ndrop DP-1 2147483647 2147483647\npending\n";
        let mut out = Vec::new();

        // Act
        run_shell(&mut session, script, &mut out).await.expect("shell io");

        // Assert: each drop fell back to the free anchor, nothing pending
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("No pending layout changes"));
        assert_eq!(
            status.current().as_deref(),
            Some("Moved DP-1 to a free spot at (400, 20)")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shell_runs_deferred_refresh_while_waiting_for_input() {
        // Arrange: input arrives through a pipe; quit is sent two seconds later
        let backend = Arc::new(RecordingBackend::new(TWO_SIDE_BY_SIDE));
        let (mut session, _) = session_over(backend.clone());
        let (reader, mut writer) = tokio::io::duplex(256);
        let feeder = tokio::spawn(async move {
            writer
                .write_all(b"click HDMI-1\nclick DP-1\nmirror\n")
                .await
                .expect("write script");
            tokio::time::sleep(Duration::from_secs(2)).await;
            writer.write_all(b"quit\n").await.expect("write quit");
        });
        let mut out = Vec::new();

        // Act
        run_shell(&mut session, BufReader::new(reader), &mut out)
            .await
            .expect("shell io");
        feeder.await.expect("feeder task");

        // Assert: the initial refresh plus exactly one deferred refresh
        assert_eq!(query_count(&backend), 2);
    }
}
