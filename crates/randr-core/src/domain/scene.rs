//! Projection of real monitor geometry onto the arrangement canvas.
//!
//! The canvas is a small 2-D surface (roughly 700 units wide) on which each
//! monitor is drawn as a tile.  Real X-screen coordinates can be thousands of
//! pixels wide and may be negative, so they are shifted to start at the
//! smallest x / y and scaled down.  Tiles never shrink below a minimum size,
//! and each tile is nudged right by its list index so that mirrored monitors
//! (which share a position) do not cover each other completely.
//!
//! The snap engine only ever sees canvas rectangles.  Real geometry is
//! recovered from xrandr after the relative-placement commands have run.

use super::monitor::Monitor;
use super::snap::{DropOutcome, LayoutError, Rect, SnapEngine};

/// Upper bound on the scale factor from real pixels to canvas units.
const MAX_SCALE: f64 = 0.15;
/// Scale factor used when the total width is zero.
const EMPTY_SCALE: f64 = 0.1;
/// Canvas width the combined monitors are fitted into.
const FIT_WIDTH: f64 = 700.0;
/// Horizontal gap assumed between monitors when fitting.
const FIT_GAP: u64 = 100;
/// Canvas margin on the top and left.
const MARGIN: i32 = 20;
/// Per-index horizontal stagger.
const STAGGER: i32 = 10;
/// Minimum tile width.
const MIN_TILE_WIDTH: u32 = 100;
/// Minimum tile height.
const MIN_TILE_HEIGHT: u32 = 60;

/// One monitor's tile on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTile {
    /// The monitor this tile represents.
    pub name: String,
    /// Position and size in canvas units.
    pub rect: Rect,
}

/// Every monitor's tile plus the scale used to produce them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    scale: f64,
    tiles: Vec<SceneTile>,
}

impl Scene {
    /// Projects `monitors` onto the canvas, preserving list order.
    pub fn project(monitors: &[Monitor]) -> Self {
        if monitors.is_empty() {
            return Self {
                scale: EMPTY_SCALE,
                tiles: Vec::new(),
            };
        }

        let total_width: u64 = monitors.iter().map(|m| u64::from(m.width)).sum::<u64>()
            + FIT_GAP * (monitors.len() as u64 - 1);
        let scale = if total_width > 0 {
            MAX_SCALE.min(FIT_WIDTH / total_width as f64)
        } else {
            EMPTY_SCALE
        };

        let min_x = monitors.iter().map(|m| m.x).min().unwrap_or(0);
        let min_y = monitors.iter().map(|m| m.y).min().unwrap_or(0);

        let tiles = monitors
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let x = ((f64::from(m.x) - f64::from(min_x)) * scale) as i32
                    + MARGIN
                    + i as i32 * STAGGER;
                let y = ((f64::from(m.y) - f64::from(min_y)) * scale) as i32 + MARGIN;
                let width = ((f64::from(m.width) * scale) as u32).max(MIN_TILE_WIDTH);
                let height = ((f64::from(m.height) * scale) as u32).max(MIN_TILE_HEIGHT);
                SceneTile {
                    name: m.name.clone(),
                    rect: Rect::new(x, y, width, height),
                }
            })
            .collect();

        Self { scale, tiles }
    }

    /// Real pixels → canvas units.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// All tiles in monitor-list order.
    pub fn tiles(&self) -> &[SceneTile] {
        &self.tiles
    }

    /// Returns the tile rectangle for `name`.
    pub fn rect_of(&self, name: &str) -> Option<Rect> {
        self.tiles.iter().find(|t| t.name == name).map(|t| t.rect)
    }

    /// Moves `name`'s tile so its top-left corner is at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownMonitor`] if no tile has that name.
    pub fn move_tile(&mut self, name: &str, x: i32, y: i32) -> Result<(), LayoutError> {
        let tile = self
            .tiles
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| LayoutError::UnknownMonitor(name.to_string()))?;
        tile.rect = tile.rect.moved_to(x, y);
        Ok(())
    }

    /// Drops `name`'s tile at `(x, y)` and lets `engine` decide where it ends up.
    ///
    /// The tile is left at the resolved position: the snap or fallback position
    /// when there is one, otherwise the drop point.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownMonitor`] if no tile has that name.
    pub fn drop_tile(
        &mut self,
        name: &str,
        x: i32,
        y: i32,
        engine: &SnapEngine,
    ) -> Result<DropOutcome, LayoutError> {
        self.move_tile(name, x, y)?;
        let dropped = self
            .rect_of(name)
            .ok_or_else(|| LayoutError::UnknownMonitor(name.to_string()))?;

        let outcome = engine.resolve(name, &dropped, &self.tiles);
        match &outcome {
            DropOutcome::Snapped { position, .. } | DropOutcome::Relocated { position } => {
                self.move_tile(name, position.0, position.1)?;
            }
            DropOutcome::Stayed => {}
        }
        Ok(outcome)
    }
}
