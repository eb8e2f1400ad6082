//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! platform-appropriate directory and falls back to defaults when it does not
//! exist.  randr-desk never writes this file, and never persists display
//! layouts either: xrandr itself is the source of truth.

pub mod config;
