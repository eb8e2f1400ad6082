//! Drag-and-drop snap engine.
//!
//! The arrangement canvas shows one tile per monitor (see [`super::scene`]).
//! When the user drops a tile, the engine decides where it ends up:
//!
//! 1. For every other tile, four candidate positions place the dropped tile
//!    flush against one of that tile's edges.
//! 2. The candidate closest to the drop point wins, provided it is closer than
//!    `3 × sensitivity` canvas units.
//! 3. A winner that would overlap any tile is vetoed; the engine then tries a
//!    fixed list of anchor points and takes the first free one.
//!
//! A successful snap produces a [`PendingChange`]: "put monitor A right-of B",
//! which is only sent to xrandr when the user applies the layout.
//!
//! # Enumeration order
//!
//! Candidates are enumerated tile by tile in scene order, and within a tile in
//! [`Direction::ALL`] order (right-of, left-of, above, below).  A later
//! candidate replaces the current best only when it is strictly closer, so
//! equidistant candidates resolve to whichever came first.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::scene::SceneTile;

/// Default snap sensitivity in canvas units.  The snap radius is three times this.
pub const DEFAULT_SENSITIVITY: u32 = 50;

/// Anchor points tried, in order, when a snap is vetoed.
pub const DEFAULT_FALLBACK_ANCHORS: [(i32, i32); 5] =
    [(20, 20), (200, 20), (400, 20), (20, 150), (200, 150)];

/// Errors that can occur when rearranging the canvas.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// The named monitor has no tile on the canvas.
    #[error("monitor not found on canvas: {0}")]
    UnknownMonitor(String),
}

/// An axis-aligned rectangle.
///
/// Used both for real monitor geometry (X screen pixels) and for canvas tiles
/// (scaled units).  `x` and `y` are the top-left corner and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the rightmost X coordinate (exclusive), saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(extent(self.width))
    }

    /// Returns the bottommost Y coordinate (exclusive), saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(extent(self.height))
    }

    /// Returns a copy of this rectangle with its top-left corner at `(x, y)`.
    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }

    /// Returns `true` if this rectangle overlaps `other`.
    ///
    /// The test is strict on both axes: rectangles that only share an edge do
    /// not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// A tile length as a signed coordinate offset.
fn extent(length: u32) -> i32 {
    i32::try_from(length).unwrap_or(i32::MAX)
}

/// Where a monitor is placed relative to a reference monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    RightOf,
    LeftOf,
    Above,
    Below,
}

impl Direction {
    /// Candidate enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::RightOf,
        Direction::LeftOf,
        Direction::Above,
        Direction::Below,
    ];

    /// The xrandr spelling without dashes: `right-of`, `left-of`, `above`, `below`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::RightOf => "right-of",
            Direction::LeftOf => "left-of",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }

    /// The xrandr flag: `--right-of`, `--left-of`, `--above`, `--below`.
    pub fn flag(&self) -> String {
        format!("--{}", self.as_str())
    }

    /// Top-left position that puts `dragged` flush against this side of `other`.
    ///
    /// The perpendicular coordinate is taken from `other`, so the two tiles
    /// line up along their shared edge.
    fn place(&self, dragged: &Rect, other: &Rect) -> (i32, i32) {
        match self {
            Direction::RightOf => (other.right(), other.y),
            Direction::LeftOf => (other.x.saturating_sub(extent(dragged.width)), other.y),
            Direction::Above => (other.x, other.y.saturating_sub(extent(dragged.height))),
            Direction::Below => (other.x, other.bottom()),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("--") {
            "right-of" => Ok(Direction::RightOf),
            "left-of" => Ok(Direction::LeftOf),
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// One possible snap position for the dragged tile.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCandidate {
    /// Name of the monitor whose edge the candidate is flush against.
    pub reference: String,
    /// Which side of the reference monitor.
    pub direction: Direction,
    /// Candidate top-left X.
    pub x: i32,
    /// Candidate top-left Y.
    pub y: i32,
    /// Euclidean distance from the dragged tile's top-left corner.
    pub distance: f64,
}

/// How a drop was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The tile snapped flush against `reference`.  A pending change is due.
    Snapped {
        position: (i32, i32),
        reference: String,
        direction: Direction,
    },
    /// The snap was vetoed (or the drop point overlapped a tile) and the tile
    /// moved to a free fallback anchor.  No pending change.
    Relocated { position: (i32, i32) },
    /// The tile stays where it was dropped.  No pending change.
    Stayed,
}

/// Decides where dropped tiles end up.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapEngine {
    /// Snap sensitivity in canvas units; candidates must be closer than three times this.
    pub sensitivity: u32,
    /// Anchor points tried in order when a snap is vetoed.
    pub fallback_anchors: Vec<(i32, i32)>,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY, DEFAULT_FALLBACK_ANCHORS.to_vec())
    }
}

impl SnapEngine {
    pub fn new(sensitivity: u32, fallback_anchors: Vec<(i32, i32)>) -> Self {
        Self {
            sensitivity,
            fallback_anchors,
        }
    }

    /// Candidates farther than this (or exactly this far) never snap.
    pub fn threshold(&self) -> f64 {
        f64::from(self.sensitivity) * 3.0
    }

    /// Returns the four candidates for `dragged` against `other`, in
    /// [`Direction::ALL`] order.
    pub fn candidates(dragged: &Rect, other: &SceneTile) -> [SnapCandidate; 4] {
        Direction::ALL.map(|direction| {
            let (x, y) = direction.place(dragged, &other.rect);
            let dx = f64::from(dragged.x) - f64::from(x);
            let dy = f64::from(dragged.y) - f64::from(y);
            SnapCandidate {
                reference: other.name.clone(),
                direction,
                x,
                y,
                distance: (dx * dx + dy * dy).sqrt(),
            }
        })
    }

    /// Returns the globally closest candidate within the snap radius.
    ///
    /// `tiles` may include the dragged tile itself; it is skipped by name.
    pub fn nearest_candidate(
        &self,
        dragged_name: &str,
        dragged: &Rect,
        tiles: &[SceneTile],
    ) -> Option<SnapCandidate> {
        let threshold = self.threshold();
        let mut best: Option<SnapCandidate> = None;

        for other in tiles.iter().filter(|t| t.name != dragged_name) {
            for candidate in Self::candidates(dragged, other) {
                if candidate.distance >= threshold {
                    continue;
                }
                let closer = best
                    .as_ref()
                    .map_or(true, |b| candidate.distance < b.distance);
                if closer {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Returns `true` if `rect` overlaps any tile other than `dragged_name`.
    pub fn would_overlap(dragged_name: &str, rect: &Rect, tiles: &[SceneTile]) -> bool {
        tiles
            .iter()
            .filter(|t| t.name != dragged_name)
            .any(|t| rect.overlaps(&t.rect))
    }

    /// Returns the first fallback anchor at which `dragged` overlaps nothing.
    pub fn fallback_position(
        &self,
        dragged_name: &str,
        dragged: &Rect,
        tiles: &[SceneTile],
    ) -> Option<(i32, i32)> {
        self.fallback_anchors
            .iter()
            .copied()
            .find(|&(x, y)| !Self::would_overlap(dragged_name, &dragged.moved_to(x, y), tiles))
    }

    /// Resolves a drop of `dragged_name`, whose tile now sits at `dragged`.
    ///
    /// - Closest candidate within range and free → [`DropOutcome::Snapped`].
    /// - Closest candidate overlaps a tile → fallback anchors.
    /// - No candidate in range → fallback anchors.
    /// - No free anchor → [`DropOutcome::Stayed`].
    pub fn resolve(&self, dragged_name: &str, dragged: &Rect, tiles: &[SceneTile]) -> DropOutcome {
        match self.nearest_candidate(dragged_name, dragged, tiles) {
            Some(candidate) => {
                let placed = dragged.moved_to(candidate.x, candidate.y);
                if !Self::would_overlap(dragged_name, &placed, tiles) {
                    return DropOutcome::Snapped {
                        position: (candidate.x, candidate.y),
                        reference: candidate.reference,
                        direction: candidate.direction,
                    };
                }
                debug!(
                    "snap of {dragged_name} {} {} vetoed: overlaps another tile",
                    candidate.direction, candidate.reference
                );
                self.relocate(dragged_name, dragged, tiles)
            }
            None => self.relocate(dragged_name, dragged, tiles),
        }
    }

    fn relocate(&self, dragged_name: &str, dragged: &Rect, tiles: &[SceneTile]) -> DropOutcome {
        match self.fallback_position(dragged_name, dragged, tiles) {
            Some(position) => DropOutcome::Relocated { position },
            None => {
                debug!("no free fallback anchor for {dragged_name}; leaving it where dropped");
                DropOutcome::Stayed
            }
        }
    }
}

// ── Pending layout changes ────────────────────────────────────────────────────

/// An uncommitted "put `monitor` `direction` `reference`" decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub monitor: String,
    pub reference: String,
    pub direction: Direction,
}

/// Pending changes keyed by monitor name, at most one per monitor.
///
/// Entries keep the slot of the monitor's first snap, so apply order is the
/// order in which monitors were first moved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingLayout {
    entries: Vec<PendingChange>,
}

impl PendingLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `change`, replacing any earlier change for the same monitor.
    pub fn record(&mut self, change: PendingChange) {
        match self.entries.iter_mut().find(|e| e.monitor == change.monitor) {
            Some(existing) => *existing = change,
            None => self.entries.push(change),
        }
    }

    /// Returns the pending change for `monitor`, if any.
    pub fn get(&self, monitor: &str) -> Option<&PendingChange> {
        self.entries.iter().find(|e| e.monitor == monitor)
    }

    /// Returns `true` if `monitor` has an uncommitted change.
    pub fn contains(&self, monitor: &str) -> bool {
        self.get(monitor).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingChange> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
