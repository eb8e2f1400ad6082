//! LayoutSession: the single owner of everything the user is arranging.
//!
//! The session holds the last parsed monitor list together with what is
//! derived from it (mirror groups, canvas scene, mode catalogue) and the
//! user's in-progress intent (selection, pending snaps, chosen mode and rate).
//! Every front-end action is a method here.
//!
//! # Refresh model (for beginners)
//!
//! The session never assumes a command did what it asked for.  After a
//! successful action it *schedules* a refresh: xrandr needs a moment before
//! the new layout is visible in `--query`, so the front-end waits
//! ([`SessionSettings::refresh_after_action`] after mirror/extend,
//! [`SessionSettings::refresh_after_batch`] after apply/unlink) and then calls
//! [`LayoutSession::refresh`].  The session itself owns no timer; the
//! front-end collects the request with [`LayoutSession::take_scheduled_refresh`].
//!
//! # Ownership
//!
//! One task owns the session.  The backend and the status sink are shared
//! trait objects (`Arc<dyn ..>`) so that the front-end can keep its own
//! handle on them.

use std::sync::Arc;
use std::time::Duration;

use randr_core::domain::modes::{is_rate_choice, DEFAULT_MODE, DEFAULT_RATE};
use randr_core::{
    apply_pending_commands, find_mirror_groups, unlink_commands, DropOutcome, ExtendSide,
    LayoutError, MirrorGroups, ModeCatalogue, Monitor, PendingChange, PendingLayout, RandrCommand,
    Scene, Selection, SelectionChange, SnapEngine,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::dispatch::{query_monitors, run_batch, run_command, DispatchError, DisplayBackend};
use super::status::StatusSink;

/// Errors returned by session actions.
///
/// Backend failures are also reported on the status channel before being
/// returned, so interactive callers may ignore them.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown monitor: {0}")]
    UnknownMonitor(String),

    #[error("source and target must be different monitors")]
    SameMonitor,

    #[error("select a source and a target display first")]
    IncompleteSelection,

    #[error("unknown mode {0}; run `list` to see the available modes")]
    UnknownMode(String),

    #[error("unsupported refresh rate {0}; choose one of 30.00, 50.00, 59.94, 60.00")]
    UnsupportedRate(String),

    #[error("no pending layout changes")]
    NothingPending,

    #[error("no mirrored displays found")]
    NothingMirrored,

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("xrandr failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Tunables the session takes from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Delay before re-reading the layout after mirror / extend.
    pub refresh_after_action: Duration,
    /// Delay before re-reading the layout after apply-pending / unlink.
    pub refresh_after_batch: Duration,
    /// Preferred resolution when the catalogue offers it.
    pub default_mode: String,
    /// Initial refresh rate.
    pub default_rate: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            refresh_after_action: Duration::from_millis(1000),
            refresh_after_batch: Duration::from_millis(500),
            default_mode: DEFAULT_MODE.to_string(),
            default_rate: DEFAULT_RATE.to_string(),
        }
    }
}

/// See the module documentation.
pub struct LayoutSession {
    backend: Arc<dyn DisplayBackend>,
    status: Arc<dyn StatusSink>,
    engine: SnapEngine,
    settings: SessionSettings,

    monitors: Vec<Monitor>,
    mirror_groups: MirrorGroups,
    scene: Scene,
    catalogue: ModeCatalogue,

    selection: Selection,
    pending: PendingLayout,
    mode: String,
    rate: String,
    scheduled_refresh: Option<Duration>,
}

impl LayoutSession {
    /// Creates an empty session.  Call [`refresh`](Self::refresh) to load the monitors.
    pub fn new(
        backend: Arc<dyn DisplayBackend>,
        status: Arc<dyn StatusSink>,
        engine: SnapEngine,
        settings: SessionSettings,
    ) -> Self {
        let mode = settings.default_mode.clone();
        let rate = settings.default_rate.clone();
        Self {
            backend,
            status,
            engine,
            settings,
            monitors: Vec::new(),
            mirror_groups: MirrorGroups::default(),
            scene: Scene::project(&[]),
            catalogue: ModeCatalogue::default(),
            selection: Selection::new(),
            pending: PendingLayout::new(),
            mode,
            rate,
            scheduled_refresh: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn monitor(&self, name: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.name == name)
    }

    pub fn mirror_groups(&self) -> &MirrorGroups {
        &self.mirror_groups
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn catalogue(&self) -> &ModeCatalogue {
        &self.catalogue
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn pending(&self) -> &PendingLayout {
        &self.pending
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn rate(&self) -> &str {
        &self.rate
    }

    pub fn engine(&self) -> &SnapEngine {
        &self.engine
    }

    /// `true` when mirror / extend can run.
    pub fn can_act_on_selection(&self) -> bool {
        self.selection.pair().is_some()
    }

    /// `true` when unlink has something to do.
    pub fn can_unlink(&self) -> bool {
        self.mirror_groups.any_mirrored()
    }

    /// Returns and clears the pending refresh request, if any.
    pub fn take_scheduled_refresh(&mut self) -> Option<Duration> {
        self.scheduled_refresh.take()
    }

    // ── Refresh ───────────────────────────────────────────────────────────────

    /// Re-reads the layout and rebuilds everything derived from it.
    ///
    /// Pending snaps are discarded.  Selected monitors stay selected while
    /// they are still connected.  A failed query is reported on the status
    /// line and leaves an empty monitor list.
    ///
    /// Returns the number of connected monitors found.
    pub fn refresh(&mut self) -> usize {
        let monitors = match query_monitors(self.backend.as_ref()) {
            Ok(monitors) => monitors,
            Err(e) => {
                warn!("query failed: {e}");
                self.status
                    .status(&format!("Error running xrandr: {}", e.diagnostic()));
                Vec::new()
            }
        };

        self.mirror_groups = find_mirror_groups(&monitors);
        self.scene = Scene::project(&monitors);
        self.catalogue = ModeCatalogue::from_monitors(&monitors);
        self.pending.clear();

        let known: Vec<&str> = monitors.iter().map(|m| m.name.as_str()).collect();
        self.selection.retain_known(|name| known.contains(&name));

        if !self.catalogue.contains(&self.mode) {
            self.mode = if self.catalogue.contains(&self.settings.default_mode) {
                self.settings.default_mode.clone()
            } else {
                self.catalogue.default_mode().to_string()
            };
        }

        self.monitors = monitors;
        let count = self.monitors.len();
        info!("refresh found {count} connected monitor(s)");
        if count == 0 {
            self.status.status("No displays found");
        } else {
            self.status
                .status(&format!("Found {count} connected display(s)"));
        }
        count
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Toggle-clicks monitor `name`.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownMonitor`] if `name` is not connected.
    pub fn click(&mut self, name: &str) -> Result<SelectionChange, SessionError> {
        self.require_monitor(name)?;
        let change = self.selection.click(name);
        match &change {
            SelectionChange::SourceSet(n) => self.status.status(&format!("Selected {n} as source")),
            SelectionChange::TargetSet(n) => self.status.status(&format!("Selected {n} as target")),
            SelectionChange::SourceCleared(n) | SelectionChange::TargetCleared(n) => {
                self.status.status(&format!("Deselected {n}"))
            }
            SelectionChange::Ignored => debug!("click on {name} ignored: source and target already set"),
        }
        Ok(change)
    }

    /// Selects `source` and `target` directly.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownMonitor`] for an unknown name,
    /// [`SessionError::SameMonitor`] if both names are equal.
    pub fn select(&mut self, source: &str, target: &str) -> Result<(), SessionError> {
        self.require_monitor(source)?;
        self.require_monitor(target)?;
        if source == target {
            return Err(SessionError::SameMonitor);
        }
        self.selection.clear();
        self.selection.click(source);
        self.selection.click(target);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.status.status("Selection cleared");
    }

    // ── Mode and rate ─────────────────────────────────────────────────────────

    /// Chooses the resolution used by mirror / extend.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownMode`] if no connected monitor offers `mode`.
    pub fn set_mode(&mut self, mode: &str) -> Result<(), SessionError> {
        if !self.catalogue.is_empty() && !self.catalogue.contains(mode) {
            return Err(SessionError::UnknownMode(mode.to_string()));
        }
        self.mode = mode.to_string();
        Ok(())
    }

    /// Chooses the refresh rate used by mirror / extend.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnsupportedRate`] if `rate` is not one of the offered choices.
    pub fn set_rate(&mut self, rate: &str) -> Result<(), SessionError> {
        if !is_rate_choice(rate) {
            return Err(SessionError::UnsupportedRate(rate.to_string()));
        }
        self.rate = rate.to_string();
        Ok(())
    }

    // ── Canvas ────────────────────────────────────────────────────────────────

    /// Drops `name`'s tile at canvas position `(x, y)`.
    ///
    /// A snap records a pending change (replacing any earlier one for the
    /// same monitor).  Nothing is sent to xrandr until
    /// [`apply_pending`](Self::apply_pending).
    ///
    /// # Errors
    ///
    /// [`SessionError::Layout`] if `name` has no tile.
    pub fn drop_tile(&mut self, name: &str, x: i32, y: i32) -> Result<DropOutcome, SessionError> {
        let outcome = self.scene.drop_tile(name, x, y, &self.engine)?;
        match &outcome {
            DropOutcome::Snapped {
                reference,
                direction,
                ..
            } => {
                self.pending.record(PendingChange {
                    monitor: name.to_string(),
                    reference: reference.clone(),
                    direction: *direction,
                });
                self.status
                    .status(&format!("Snapped {name} {direction} {reference}"));
            }
            DropOutcome::Relocated { position } => {
                self.status.status(&format!(
                    "Moved {name} to a free spot at ({}, {})",
                    position.0, position.1
                ));
            }
            DropOutcome::Stayed => debug!("{name} dropped at ({x}, {y}) without snapping"),
        }
        Ok(outcome)
    }

    /// Sends every pending change to xrandr, in pending order.
    ///
    /// Every change is attempted even if an earlier one fails.  Pending
    /// changes are cleared afterwards regardless of failures, and a refresh
    /// is scheduled.
    ///
    /// Returns the number of changes that succeeded.
    ///
    /// # Errors
    ///
    /// [`SessionError::NothingPending`] if there is nothing to apply.
    pub fn apply_pending(&mut self) -> Result<usize, SessionError> {
        if self.pending.is_empty() {
            return Err(SessionError::NothingPending);
        }

        let report = run_batch(self.backend.as_ref(), apply_pending_commands(&self.pending));
        for (item, err) in report.failures() {
            self.status.status(&format!(
                "Failed to position {}: {}",
                item.output(),
                err.diagnostic()
            ));
        }

        let applied = report.succeeded();
        info!("applied {applied} of {} layout change(s)", report.attempted());
        if applied > 0 {
            self.status
                .status(&format!("Applied {applied} layout change(s)"));
        }

        self.pending.clear();
        self.scheduled_refresh = Some(self.settings.refresh_after_batch);
        Ok(applied)
    }

    // ── Mirror / extend / unlink ──────────────────────────────────────────────

    /// Mirrors the selected source onto the selected target.
    ///
    /// # Errors
    ///
    /// [`SessionError::IncompleteSelection`] without both selections, or
    /// [`SessionError::Dispatch`] if xrandr failed (also sent to the error channel).
    pub fn mirror(&mut self) -> Result<(), SessionError> {
        let (source, target) = self.selected_pair()?;
        let command = RandrCommand::mirror(&source, &target, &self.mode, &self.rate);
        self.run_action(command)
    }

    /// Extends the selected target to `side` of the selected source.
    ///
    /// # Errors
    ///
    /// Same as [`mirror`](Self::mirror).
    pub fn extend(&mut self, side: ExtendSide) -> Result<(), SessionError> {
        let (source, target) = self.selected_pair()?;
        let command = RandrCommand::extend(&source, &target, &self.mode, &self.rate, side);
        self.run_action(command)
    }

    /// Breaks every mirror by laying all monitors out left to right.
    ///
    /// Returns the number of monitors that were placed successfully.
    ///
    /// # Errors
    ///
    /// [`SessionError::NothingMirrored`] if no monitors share a position.
    pub fn unlink(&mut self) -> Result<usize, SessionError> {
        if !self.mirror_groups.any_mirrored() {
            self.status.status("No mirrored displays found");
            return Err(SessionError::NothingMirrored);
        }

        let report = run_batch(self.backend.as_ref(), unlink_commands(&self.monitors));
        for (item, err) in report.failures() {
            self.status.status(&format!(
                "Failed to unlink {}: {}",
                item.output(),
                err.diagnostic()
            ));
        }
        self.status.status("Unlinked mirrored displays");
        self.scheduled_refresh = Some(self.settings.refresh_after_batch);
        Ok(report.succeeded())
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn require_monitor(&self, name: &str) -> Result<(), SessionError> {
        match self.monitor(name) {
            Some(_) => Ok(()),
            None => Err(SessionError::UnknownMonitor(name.to_string())),
        }
    }

    fn selected_pair(&self) -> Result<(String, String), SessionError> {
        match self.selection.pair() {
            Some((source, target)) => Ok((source.to_string(), target.to_string())),
            None => {
                self.status.status("Select a source and a target display first");
                Err(SessionError::IncompleteSelection)
            }
        }
    }

    fn run_action(&mut self, command: RandrCommand) -> Result<(), SessionError> {
        let description = command.describe();
        self.status.status(&format!("{description}..."));

        match run_command(self.backend.as_ref(), &command) {
            Ok(_) => {
                info!("{description} succeeded");
                self.status.status(&format!("{description} - Success!"));
                self.scheduled_refresh = Some(self.settings.refresh_after_action);
                Ok(())
            }
            Err(e) => {
                self.status
                    .error(&format!("xrandr failed: {}", e.diagnostic()));
                Err(SessionError::Dispatch(e))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::application::dispatch::{CommandOutput, MockDisplayBackend};
    use randr_core::Direction;

    const TWO_SIDE_BY_SIDE: &str = "\
HDMI-1 connected primary 1920x1080+0+0 (normal) 527mm x 296mm
   1920x1080     60.00*+
   1280x720      59.94
DP-1 connected 1920x1080+1920+0 (normal) 527mm x 296mm
   1920x1080     60.00*+
";

    const TWO_MIRRORED: &str = "\
eDP-1 connected primary 1920x1080+0+0 (normal) 344mm x 194mm
   1920x1080     60.02*+
HDMI-1 connected 1920x1080+0+0 (normal) 527mm x 296mm
   1920x1080     60.00*+
";

    /// Records every message in order.
    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().expect("lock poisoned").clone()
        }
    }

    impl StatusSink for RecordingSink {
        fn status(&self, message: &str) {
            self.messages.lock().expect("lock poisoned").push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.messages
                .lock()
                .expect("lock poisoned")
                .push(format!("ERROR {message}"));
        }
    }

    /// A backend that answers queries with `report` and runs `mutate` for everything else.
    fn backend_with<F>(report: &'static str, mutate: F) -> MockDisplayBackend
    where
        F: Fn(&RandrCommand) -> CommandOutput + Send + 'static,
    {
        let mut backend = MockDisplayBackend::new();
        backend.expect_execute().returning(move |cmd| {
            if cmd.is_mutating() {
                Ok(mutate(cmd))
            } else {
                Ok(CommandOutput::success(report))
            }
        });
        backend
    }

    fn session_with(backend: MockDisplayBackend) -> (LayoutSession, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let mut session = LayoutSession::new(
            Arc::new(backend),
            sink.clone(),
            SnapEngine::default(),
            SessionSettings::default(),
        );
        session.refresh();
        (session, sink)
    }

    // ── refresh ───────────────────────────────────────────────────────────────

    #[test]
    fn test_refresh_loads_monitors_and_reports_count() {
        // Arrange / Act
        let (session, sink) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));

        // Assert
        assert_eq!(session.monitors().len(), 2);
        assert_eq!(session.scene().tiles().len(), 2);
        assert!(!session.can_unlink());
        assert_eq!(session.mode(), "1920x1080");
        assert_eq!(session.rate(), "60.00");
        assert_eq!(sink.messages(), vec!["Found 2 connected display(s)"]);
    }

    #[test]
    fn test_refresh_with_failing_query_reports_on_status_channel() {
        let mut backend = MockDisplayBackend::new();
        backend
            .expect_execute()
            .returning(|_| Ok(CommandOutput::failure(1, "Can't open display")));

        let (session, sink) = session_with(backend);

        assert!(session.monitors().is_empty());
        assert_eq!(
            sink.messages(),
            vec![
                "Error running xrandr: Can't open display".to_string(),
                "No displays found".to_string(),
            ]
        );
    }

    #[test]
    fn test_refresh_discards_pending_changes_and_keeps_known_selection() {
        // Arrange
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        session.click("HDMI-1").expect("known");
        session.drop_tile("DP-1", 25, 200).expect("known");
        assert_eq!(session.pending().len(), 1);

        // Act
        session.refresh();

        // Assert
        assert!(session.pending().is_empty());
        assert_eq!(session.selection().source(), Some("HDMI-1"));
    }

    #[test]
    fn test_refresh_keeps_chosen_mode_while_still_offered() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        session.set_mode("1280x720").expect("offered");
        session.refresh();
        assert_eq!(session.mode(), "1280x720");
    }

    // ── selection ─────────────────────────────────────────────────────────────

    #[test]
    fn test_click_reports_source_then_target() {
        let (mut session, sink) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));

        session.click("HDMI-1").expect("known");
        session.click("DP-1").expect("known");

        assert!(session.can_act_on_selection());
        let messages = sink.messages();
        assert_eq!(
            &messages[1..],
            &["Selected HDMI-1 as source", "Selected DP-1 as target"]
        );
    }

    #[test]
    fn test_click_unknown_monitor_is_rejected() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        assert_eq!(
            session.click("VGA-9"),
            Err(SessionError::UnknownMonitor("VGA-9".to_string()))
        );
    }

    #[test]
    fn test_select_same_monitor_twice_is_rejected() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        assert_eq!(session.select("DP-1", "DP-1"), Err(SessionError::SameMonitor));
    }

    // ── mirror / extend ───────────────────────────────────────────────────────

    #[test]
    fn test_mirror_runs_command_and_schedules_refresh() {
        // Arrange
        let issued = Arc::new(Mutex::new(Vec::new()));
        let issued_in_backend = issued.clone();
        let (mut session, sink) = session_with(backend_with(TWO_SIDE_BY_SIDE, move |cmd| {
            issued_in_backend.lock().expect("lock poisoned").push(cmd.args());
            CommandOutput::success("")
        }));
        session.select("HDMI-1", "DP-1").expect("valid pair");

        // Act
        let result = session.mirror();

        // Assert
        assert_eq!(result, Ok(()));
        assert_eq!(
            issued.lock().expect("lock poisoned").clone(),
            vec![vec![
                "--output", "DP-1", "--same-as", "HDMI-1", "--mode", "1920x1080", "--rate",
                "60.00"
            ]]
        );
        let messages = sink.messages();
        assert_eq!(
            &messages[messages.len() - 2..],
            &["Mirroring HDMI-1 to DP-1...", "Mirroring HDMI-1 to DP-1 - Success!"]
        );
        assert_eq!(
            session.take_scheduled_refresh(),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(session.take_scheduled_refresh(), None);
    }

    #[test]
    fn test_extend_failure_goes_to_error_channel_without_refresh() {
        let (mut session, sink) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::failure(1, "xrandr: Configure crtc 1 failed\n")
        }));
        session.select("HDMI-1", "DP-1").expect("valid pair");

        let result = session.extend(ExtendSide::Left);

        assert!(matches!(result, Err(SessionError::Dispatch(_))));
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("ERROR xrandr failed: xrandr: Configure crtc 1 failed")
        );
        assert_eq!(session.take_scheduled_refresh(), None);
    }

    #[test]
    fn test_mirror_without_selection_is_rejected() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        session.click("HDMI-1").expect("known");
        assert_eq!(session.mirror(), Err(SessionError::IncompleteSelection));
    }

    #[test]
    fn test_set_rate_rejects_values_outside_choices() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        assert_eq!(
            session.set_rate("75.00"),
            Err(SessionError::UnsupportedRate("75.00".to_string()))
        );
        assert_eq!(session.set_rate("59.94"), Ok(()));
        assert_eq!(session.rate(), "59.94");
    }

    #[test]
    fn test_set_mode_rejects_unknown_mode() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        assert_eq!(
            session.set_mode("3840x2160"),
            Err(SessionError::UnknownMode("3840x2160".to_string()))
        );
    }

    // ── drop / apply ──────────────────────────────────────────────────────────

    #[test]
    fn test_drop_tile_snap_records_pending_change() {
        let (mut session, sink) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));

        let outcome = session.drop_tile("DP-1", 25, 200).expect("known tile");

        assert!(matches!(outcome, DropOutcome::Snapped { .. }));
        assert_eq!(
            session.pending().get("DP-1").map(|c| (c.reference.as_str(), c.direction)),
            Some(("HDMI-1", Direction::Below))
        );
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("Snapped DP-1 below HDMI-1")
        );
    }

    #[test]
    fn test_drop_unknown_tile_is_an_error() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        assert!(matches!(
            session.drop_tile("ghost", 0, 0),
            Err(SessionError::Layout(LayoutError::UnknownMonitor(_)))
        ));
    }

    #[test]
    fn test_apply_pending_clears_changes_and_schedules_short_refresh() {
        let (mut session, sink) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        session.drop_tile("DP-1", 25, 200).expect("known tile");

        let applied = session.apply_pending();

        assert_eq!(applied, Ok(1));
        assert!(session.pending().is_empty());
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("Applied 1 layout change(s)")
        );
        assert_eq!(
            session.take_scheduled_refresh(),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_apply_with_nothing_pending_is_rejected() {
        let (mut session, _) = session_with(backend_with(TWO_SIDE_BY_SIDE, |_| {
            CommandOutput::success("")
        }));
        assert_eq!(session.apply_pending(), Err(SessionError::NothingPending));
    }

    // ── unlink ────────────────────────────────────────────────────────────────

    #[test]
    fn test_unlink_without_mirrors_reports_and_does_nothing() {
        let mut backend = MockDisplayBackend::new();
        backend
            .expect_execute()
            .withf(|cmd| !cmd.is_mutating())
            .returning(|_| Ok(CommandOutput::success(TWO_SIDE_BY_SIDE)));
        let (mut session, sink) = session_with(backend);

        assert_eq!(session.unlink(), Err(SessionError::NothingMirrored));
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("No mirrored displays found")
        );
    }

    #[test]
    fn test_unlink_chains_all_monitors_and_reports_failures() {
        let (mut session, sink) = session_with(backend_with(TWO_MIRRORED, |cmd| {
            if cmd.output() == Some("HDMI-1") {
                CommandOutput::failure(1, "")
            } else {
                CommandOutput::success("")
            }
        }));
        assert!(session.can_unlink());

        let placed = session.unlink();

        assert_eq!(placed, Ok(1));
        let messages = sink.messages();
        assert_eq!(
            &messages[messages.len() - 2..],
            &["Failed to unlink HDMI-1: Unknown error", "Unlinked mirrored displays"]
        );
        assert_eq!(
            session.take_scheduled_refresh(),
            Some(Duration::from_millis(500))
        );
    }
}
