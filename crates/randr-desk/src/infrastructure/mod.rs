//! Infrastructure layer for randr-desk.
//!
//! Contains OS-facing adapters: the `xrandr` process backend (plus dry-run
//! and test doubles), configuration file loading, status output, the text
//! views of the session and the interactive shell.
//!
//! **Dependency rule**: this layer may depend on `application` and `randr_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod backend;
pub mod shell;
pub mod status;
pub mod storage;
pub mod ui_bridge;
