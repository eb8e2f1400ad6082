//! Application layer use cases for randr-desk.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `randr_core`) and the infrastructure (processes, files,
//! terminal).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "mirror the
//!   selected source onto the selected target, then re-read the layout").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the real `xrandr` process can be swapped for a dry-run printer or a
//!   test double without changing this code.
//! - **Contain no process spawning and no file system access**.
//!
//! # Sub-modules
//!
//! - **`dispatch`** – Runs one command (or a batch) through a
//!   [`dispatch::DisplayBackend`] and interprets the exit status.
//!
//! - **`session`**  – The single owner of the monitor list, mirror groups,
//!   canvas, pending changes and selection.  Every user action goes through it.
//!
//! - **`status`**   – The status/error channel the session reports to.

pub mod dispatch;
pub mod session;
pub mod status;
