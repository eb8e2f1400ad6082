//! Parser for the `xrandr --query` report.
//!
//! # Input format (for beginners)
//!
//! ```text
//! Screen 0: minimum 8 x 8, current 3840 x 1080, maximum 32767 x 32767
//! eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 344mm x 194mm
//!    1920x1080     60.02*+  59.93    48.00
//!    1680x1050     59.88
//! HDMI-1 connected 1920x1080+1920+0 (normal left inverted right x axis y axis) 527mm x 296mm
//!    1920x1080     60.00*+  50.00    59.94
//!    1280x720      60.00    50.00    59.94
//! DP-1 disconnected (normal left inverted right x axis y axis)
//! ```
//!
//! Unindented lines starting with an output name are **headers**.  The
//! indented lines beneath a header list that output's **modes**: a resolution
//! followed by the refresh rates it supports.  `*` marks the active rate and
//! `+` the preferred one.
//!
//! # Rules
//!
//! - Disconnected outputs are parsed and dropped.
//! - A connected output without a `WxH+X+Y` token (connected but switched
//!   off) gets 1920x1080 at (0, 0).
//! - Each distinct resolution is listed once, in order of first appearance.
//! - A line with a `*`-marked rate sets the current mode and rate.  If an
//!   output has several marked lines, the last one wins.
//! - Anything unrecognised is skipped.  An unrecognised unindented line
//!   (e.g. `VIRTUAL1 unknown connection`) still ends the previous output's
//!   mode list.  The parser never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::domain::monitor::{Monitor, FALLBACK_HEIGHT, FALLBACK_WIDTH};

/// `NAME connected|disconnected [primary] [WxH+X+Y]`
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(connected|disconnected)\s*(primary)?\s*(?:(\d+)x(\d+)\+(-?\d+)\+(-?\d+))?")
        .expect("header pattern is valid")
});

/// `   WxH   RATE ...`
static MODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+(\d+x\d+)\s+([\d.]+)").expect("mode pattern is valid"));

/// A rate token followed by the active marker.
static ACTIVE_RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+)\*").expect("active-rate pattern is valid"));

/// Parses a full `xrandr --query` report into the active monitor list.
///
/// Output order matches input order.  Empty input yields an empty list.
pub fn parse_query_output(output: &str) -> Vec<Monitor> {
    let mut monitors: Vec<Monitor> = Vec::new();
    // Whether mode lines currently belong to the last pushed monitor.
    let mut in_connected_block = false;

    for line in output.lines() {
        // Any unindented line is a new header, recognised or not.
        if !line.starts_with(char::is_whitespace) {
            in_connected_block = false;
        }

        if let Some(caps) = HEADER_RE.captures(line) {
            let name = &caps[1];
            if &caps[2] != "connected" {
                trace!("skipping disconnected output {name}");
                continue;
            }

            let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i64>().ok());
            let width = number(4).and_then(|v| u32::try_from(v).ok()).unwrap_or(FALLBACK_WIDTH);
            let height = number(5).and_then(|v| u32::try_from(v).ok()).unwrap_or(FALLBACK_HEIGHT);
            let x = number(6).and_then(|v| i32::try_from(v).ok()).unwrap_or(0);
            let y = number(7).and_then(|v| i32::try_from(v).ok()).unwrap_or(0);

            let mut monitor = Monitor::new(name, width, height, x, y);
            monitor.is_primary = caps.get(3).is_some();
            monitors.push(monitor);
            in_connected_block = true;
            continue;
        }

        if !in_connected_block {
            continue;
        }
        let Some(current) = monitors.last_mut() else {
            continue;
        };
        let Some(caps) = MODE_RE.captures(line) else {
            continue;
        };

        let mode = &caps[1];
        current.push_mode(mode);
        if let Some(active) = ACTIVE_RATE_RE.captures(line) {
            current.current_mode = mode.to_string();
            current.current_rate = active[1].to_string();
        }
    }

    monitors
}

// ── Tests ─────────────────────────────────────────────────────────────────────
