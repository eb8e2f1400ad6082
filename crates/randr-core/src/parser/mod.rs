//! Parsers for the display tool's textual output.
//!
//! - **`query`** – `xrandr --query` report → ordered list of connected monitors.

pub mod query;
