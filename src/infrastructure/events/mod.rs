//! Event Sink Implementations
//!
//! Provides concrete implementations of DeployEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! The console sink lives with the binary's views; the interrupt sink in
//! `infrastructure::signals`.

mod json;

pub use json::JsonEventSink;
