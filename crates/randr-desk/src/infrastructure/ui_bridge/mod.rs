//! View bridge: turns session state into what the terminal front-end shows.
//!
//! Nothing here mutates the session.  Views are rebuilt from the session on
//! demand, so there is no long-lived name→widget map to keep in sync after a
//! refresh.
//!
//! # Data Transfer Objects (DTOs)
//!
//! [`MonitorDto`] is the serialisable form of one monitor used by
//! `randr-desk list --json`.  It flattens the monitor record and adds the
//! derived facts a user interface needs: which monitors it mirrors, whether it
//! is selected, and whether it has an unapplied snap.
//!
//! [`TileView`] is one canvas tile plus the same annotations, used for the
//! `canvas` listing in the interactive shell.

use std::fmt::Write as _;

use randr_core::{Monitor, PendingLayout, Rect, RATE_CHOICES};
use serde::{Deserialize, Serialize};

use crate::application::session::LayoutSession;

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Selection role of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Source,
    Target,
}

/// DTO for one connected monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorDto {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub primary: bool,
    pub current_mode: String,
    pub current_rate: String,
    pub modes: Vec<String>,
    /// Other monitors at the same position.  Empty when not mirrored.
    pub mirrored_with: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// `"<direction> <reference>"` when a snap is waiting to be applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<String>,
}

impl MonitorDto {
    fn from_monitor(monitor: &Monitor, session: &LayoutSession) -> Self {
        Self {
            name: monitor.name.clone(),
            width: monitor.width,
            height: monitor.height,
            x: monitor.x,
            y: monitor.y,
            primary: monitor.is_primary,
            current_mode: monitor.current_mode.clone(),
            current_rate: monitor.current_rate.clone(),
            modes: monitor.modes.clone(),
            mirrored_with: session.mirror_groups().partners_of(&monitor.name),
            role: role_of(session, &monitor.name),
            pending: pending_label(session.pending(), &monitor.name),
        }
    }
}

/// One canvas tile with its annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub name: String,
    pub rect: Rect,
    pub role: Option<Role>,
    pub mirrored: bool,
    pub pending: Option<String>,
}

/// Builds a DTO for every monitor, in session order.
pub fn monitor_dtos(session: &LayoutSession) -> Vec<MonitorDto> {
    session
        .monitors()
        .iter()
        .map(|m| MonitorDto::from_monitor(m, session))
        .collect()
}

/// Builds a view for every canvas tile, in scene order.
pub fn tile_views(session: &LayoutSession) -> Vec<TileView> {
    session
        .scene()
        .tiles()
        .iter()
        .map(|tile| TileView {
            name: tile.name.clone(),
            rect: tile.rect,
            role: role_of(session, &tile.name),
            mirrored: !session.mirror_groups().partners_of(&tile.name).is_empty(),
            pending: pending_label(session.pending(), &tile.name),
        })
        .collect()
}

fn role_of(session: &LayoutSession, name: &str) -> Option<Role> {
    let selection = session.selection();
    if selection.source() == Some(name) {
        Some(Role::Source)
    } else if selection.target() == Some(name) {
        Some(Role::Target)
    } else {
        None
    }
}

fn pending_label(pending: &PendingLayout, name: &str) -> Option<String> {
    pending
        .get(name)
        .map(|change| format!("{} {}", change.direction, change.reference))
}

// ── Text rendering ────────────────────────────────────────────────────────────

/// One line per monitor:
///
/// ```text
/// * eDP-1   1920x1080 @ 60.02  +0+0     [source] mirrored with HDMI-1
///   HDMI-1  1920x1080 @ 60.00  +0+0     mirrored with eDP-1
/// ```
///
/// `*` marks the primary monitor.
pub fn render_monitor_table(monitors: &[MonitorDto]) -> String {
    if monitors.is_empty() {
        return "No displays found\n".to_string();
    }

    let name_width = monitors.iter().map(|m| m.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for m in monitors {
        let marker = if m.primary { '*' } else { ' ' };
        let position = format!("{:+}{:+}", m.x, m.y);
        let _ = write!(
            out,
            "{marker} {:<name_width$}  {} @ {}  {:<12}",
            m.name, m.current_mode, m.current_rate, position
        );
        match m.role {
            Some(Role::Source) => out.push_str(" [source]"),
            Some(Role::Target) => out.push_str(" [target]"),
            None => {}
        }
        if !m.mirrored_with.is_empty() {
            let _ = write!(out, " mirrored with {}", m.mirrored_with.join(", "));
        }
        if let Some(pending) = &m.pending {
            let _ = write!(out, " (pending: {pending})");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// One line per tile with its canvas rectangle.
pub fn render_canvas(tiles: &[TileView], scale: f64) -> String {
    let mut out = format!("canvas scale {scale:.4}\n");
    for tile in tiles {
        let r = tile.rect;
        let _ = write!(
            out,
            "  {:<10} at ({}, {}) size {}x{}",
            tile.name, r.x, r.y, r.width, r.height
        );
        if tile.mirrored {
            out.push_str(" [mirrored]");
        }
        if let Some(pending) = &tile.pending {
            let _ = write!(out, " [pending: {pending}]");
        }
        out.push('\n');
    }
    out
}

/// Pending changes in apply order.
pub fn render_pending(pending: &PendingLayout) -> String {
    if pending.is_empty() {
        return "No pending layout changes\n".to_string();
    }
    let mut out = String::new();
    for (i, change) in pending.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} {} {}",
            i + 1,
            change.monitor,
            change.direction,
            change.reference
        );
    }
    out
}

/// Resolution and rate choices with the current picks marked.
pub fn render_choices(session: &LayoutSession) -> String {
    fn mark(value: &str, current: &str) -> String {
        if value == current {
            format!("[{value}]")
        } else {
            value.to_string()
        }
    }
    let modes: Vec<String> = session
        .catalogue()
        .modes()
        .iter()
        .map(|m| mark(m, session.mode()))
        .collect();
    let rates: Vec<String> = RATE_CHOICES
        .iter()
        .map(|r| mark(r, session.rate()))
        .collect();
    format!("modes: {}\nrates: {}\n", modes.join(" "), rates.join(" "))
}

/// Serialises the monitor DTOs as pretty JSON.
///
/// # Errors
///
/// Propagates `serde_json` failures.
pub fn monitors_json(session: &LayoutSession) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&monitor_dtos(session))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
