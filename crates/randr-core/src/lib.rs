//! # randr-core
//!
//! Shared library for randr-layout containing the monitor model, the xrandr
//! query parser, mirror-group detection, the drag-and-drop snap engine, and the
//! builder that turns a resolved layout intent into xrandr arguments.
//!
//! It has zero dependencies on process spawning, terminals, or UI toolkits.
//! Everything here is pure data in, data out, so it can be tested on any
//! machine without a running X server.
//!
//! # Architecture overview (for beginners)
//!
//! randr-layout is a front-end for `xrandr`, the X11 tool that mirrors,
//! extends and positions monitors.  The program never talks to X11 directly:
//! it runs `xrandr --query`, reads the text it prints, lets the user rearrange
//! the monitors on a small canvas, and then runs single-shot `xrandr` commands
//! to commit the change.
//!
//! - **`parser`** – Turns the textual `xrandr --query` report into a list of
//!   [`Monitor`] records.
//!
//! - **`domain`** – Pure business logic: which monitors are mirrored, how the
//!   real pixel layout is projected onto the canvas, where a dropped monitor
//!   tile snaps to, which monitors are selected as source and target.
//!
//! - **`command`** – Builds the argument vectors for every xrandr invocation
//!   (mirror, extend, reposition, unlink chain).

pub mod command;
pub mod domain;
pub mod parser;

// Re-export the most-used types at the crate root so callers can write
// `randr_core::Monitor` instead of `randr_core::domain::monitor::Monitor`.
pub use command::builder::{apply_pending_commands, unlink_commands, ExtendSide, RandrCommand};
pub use domain::mirror::{find_mirror_groups, MirrorGroup, MirrorGroups};
pub use domain::modes::{ModeCatalogue, RATE_CHOICES};
pub use domain::monitor::Monitor;
pub use domain::scene::{Scene, SceneTile};
pub use domain::selection::{Selection, SelectionChange};
pub use domain::snap::{
    Direction, DropOutcome, LayoutError, PendingChange, PendingLayout, Rect, SnapCandidate,
    SnapEngine,
};
pub use parser::query::parse_query_output;
