//! Error types for StackKit
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::ports::{EngineError, LockStoreError, ObjectStoreError};

/// Result type alias for StackKit operations
pub type StackkitResult<T> = Result<T, StackkitError>;

/// Fatal errors that abort a deployment run.
///
/// Everything else (telemetry, pruning, stale-lock cleanup) is logged and
/// swallowed by the component that hit it.
#[derive(Error, Debug)]
pub enum StackkitError {
    /// Another actor holds a non-expired lock on the stack
    #[error("deployment lock for stack '{stack}' is held by {locked_by} until {expiry}")]
    LockHeld {
        stack: String,
        locked_by: String,
        expiry: DateTime<Utc>,
    },

    /// The lock table could not be read or written
    #[error("lock store error for stack '{stack}'")]
    LockStore {
        stack: String,
        #[source]
        source: LockStoreError,
    },

    /// Stack names end up in table keys and object keys
    #[error("invalid stack name '{name}': {reason}")]
    InvalidStackName { name: String, reason: String },

    /// `terraform init` (or equivalent) failed
    #[error("stack '{stack}' failed during init")]
    Init {
        stack: String,
        #[source]
        source: EngineError,
    },

    /// `terraform plan` (or equivalent) failed
    #[error("stack '{stack}' failed during plan")]
    Plan {
        stack: String,
        #[source]
        source: EngineError,
    },

    /// Backup could not be taken or restored
    #[error("backup error for stack '{stack}'")]
    Backup {
        stack: String,
        #[source]
        source: ObjectStoreError,
    },

    /// Backup exists but is not a usable Terraform state
    #[error("backup '{key}' is not a valid terraform state: {reason}")]
    InvalidBackup { key: String, reason: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {}: {message}", .file.display())]
    InvalidConfig {
        file: std::path::PathBuf,
        message: String,
    },

    /// IO error
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl StackkitError {
    /// The message followed by every underlying cause, joined with `: `
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn lock_held_names_holder_and_expiry() {
        let err = StackkitError::LockHeld {
            stack: "orders".to_string(),
            locked_by: "alice@host1".to_string(),
            expiry: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"deployment lock for stack 'orders' is held by alice@host1 until 2026-03-01 12:30:00 UTC"
        );
    }

    #[test]
    fn init_error_names_stack_and_phase() {
        let err = StackkitError::Init {
            stack: "orders".to_string(),
            source: EngineError::CommandFailed {
                command: "terraform init".to_string(),
                code: Some(1),
                stderr: "backend unreachable".to_string(),
            },
        };
        assert_eq!(err.to_string(), "stack 'orders' failed during init");
        assert!(err.chain().ends_with("backend unreachable"));
    }

    #[test]
    fn cause_appears_once_in_the_chain() {
        let err = StackkitError::LockStore {
            stack: "orders".to_string(),
            source: LockStoreError::Backend("table not found".to_string()),
        };
        let rendered = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(rendered.matches("table not found").count(), 1);
        assert_eq!(
            rendered,
            "lock store error for stack 'orders': lock store unavailable: table not found"
        );
    }
}
