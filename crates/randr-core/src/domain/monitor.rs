//! Monitor domain entity.
//!
//! A [`Monitor`] is one display output that the query command reported as
//! connected.  The list of monitors is rebuilt from scratch on every refresh;
//! no `Monitor` value outlives the query it came from.  Identity across
//! refreshes is by [`Monitor::name`] only.

use serde::{Deserialize, Serialize};

use super::snap::Rect;

/// Width substituted when a connected output reports no geometry.
pub const FALLBACK_WIDTH: u32 = 1920;

/// Height substituted when a connected output reports no geometry.
pub const FALLBACK_HEIGHT: u32 = 1080;

/// Refresh rate assumed until a marked (`*`) mode line says otherwise.
pub const FALLBACK_RATE: &str = "60.00";

/// A connected display output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    /// Output name, e.g. `HDMI-1`.  Unique within one query.
    pub name: String,
    /// Current width in pixels.
    pub width: u32,
    /// Current height in pixels.
    pub height: u32,
    /// X coordinate of the top-left corner in the X screen (may be negative).
    pub x: i32,
    /// Y coordinate of the top-left corner in the X screen (may be negative).
    pub y: i32,
    /// `true` when the header line carried the `primary` keyword.
    pub is_primary: bool,
    /// Always `true` for monitors in the active list.
    pub is_connected: bool,
    /// Available resolutions (`WxH`), in order of first appearance, no duplicates.
    pub modes: Vec<String>,
    /// Active resolution, e.g. `1920x1080`.
    pub current_mode: String,
    /// Active refresh rate, e.g. `60.00`.
    pub current_rate: String,
}

impl Monitor {
    /// Creates a connected monitor with the given geometry and no mode list.
    ///
    /// `current_mode` is derived from the geometry and `current_rate` starts at
    /// [`FALLBACK_RATE`], matching what the parser assumes before it sees a
    /// marked mode line.
    pub fn new(name: impl Into<String>, width: u32, height: u32, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            x,
            y,
            is_primary: false,
            is_connected: true,
            modes: Vec::new(),
            current_mode: format!("{width}x{height}"),
            current_rate: FALLBACK_RATE.to_string(),
        }
    }

    /// Returns the top-left corner as an `(x, y)` pair.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns the monitor's area in the X screen coordinate space.
    pub fn region(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Appends `mode` to the mode list unless it is already present.
    pub fn push_mode(&mut self, mode: &str) {
        if !self.modes.iter().any(|m| m == mode) {
            self.modes.push(mode.to_string());
        }
    }

    /// Short label used in selection read-outs: `HDMI-1 (1920x1080)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.current_mode)
    }
}
