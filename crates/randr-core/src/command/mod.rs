//! Display-tool commands.
//!
//! - **`builder`** – turns resolved user intent (mirror, extend, reposition,
//!   unlink, apply pending) into argument vectors.  Nothing here spawns a
//!   process; execution lives in the `randr-desk` dispatcher.

pub mod builder;
