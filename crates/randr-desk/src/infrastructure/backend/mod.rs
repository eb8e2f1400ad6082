//! [`DisplayBackend`](crate::application::dispatch::DisplayBackend) implementations.
//!
//! - **`xrandr`**  – spawns the real tool with `std::process::Command`.
//! - **`dry_run`** – forwards queries to an inner backend but only prints
//!   mutating commands.
//! - **`mock`**    – a scripted, recording backend for tests.

use randr_core::RandrCommand;

pub mod dry_run;
pub mod mock;
pub mod xrandr;

/// Renders `command` as a shell line, e.g. `xrandr --output DP-1 --pos 0x0`.
pub fn command_line(program: &str, command: &RandrCommand) -> String {
    let mut line = program.to_string();
    for arg in command.args() {
        line.push(' ');
        line.push_str(&arg);
    }
    line
}
