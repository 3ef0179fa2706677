//! Shared JSON event types for consistent CLI output.

use serde::Serialize;

/// Event emitted when a command finishes.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub success: bool,
    pub exit_code: i32,
}

impl<'a> CompleteEvent<'a> {
    pub fn new(command: &'a str, exit_code: i32) -> Self {
        Self {
            event: "complete",
            command,
            success: exit_code == 0,
            exit_code,
        }
    }
}

/// Event emitted when a command aborts.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub code: &'a str,
    pub message: String,
}

impl<'a> ErrorEvent<'a> {
    pub fn new(command: &'a str, code: &'a str, message: impl Into<String>) -> Self {
        Self {
            event: "error",
            command,
            code,
            message: message.into(),
        }
    }
}

/// Wrapper for data events that includes command context.
#[derive(Debug, Clone, Serialize)]
pub struct DataEvent<'a, T: Serialize> {
    pub event: &'static str,
    pub command: &'a str,
    #[serde(flatten)]
    pub data: T,
}

impl<'a, T: Serialize> DataEvent<'a, T> {
    pub fn new(command: &'a str, data: T) -> Self {
        Self {
            event: "data",
            command,
            data,
        }
    }
}
