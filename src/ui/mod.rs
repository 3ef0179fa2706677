//! Terminal output for the `stackkit` binary.
//!
//! - `json` - NDJSON events for `--json`
//! - `views` - Human-readable renderings per command
//! - `terminal` - Color and unicode detection

pub mod json;
pub mod primitives;
pub mod terminal;
pub mod theme;
pub mod views;
