//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: &DeployEvent) {
        let json = match event {
            DeployEvent::LockAcquired {
                stack,
                lock_id,
                expiry,
            } => serde_json::json!({
                "event": "lock_acquired",
                "command": "deploy",
                "stack": stack,
                "lock_id": lock_id,
                "expiry": expiry.to_rfc3339(),
            }),

            DeployEvent::PhaseStarted { phase } => serde_json::json!({
                "event": "phase",
                "command": "deploy",
                "phase": phase.as_str(),
            }),

            DeployEvent::BackupTaken { key } => serde_json::json!({
                "event": "backup",
                "command": "deploy",
                "key": key,
            }),

            DeployEvent::PlanReady { resource_changes } => serde_json::json!({
                "event": "plan",
                "command": "deploy",
                "resource_changes": resource_changes,
            }),

            DeployEvent::BackupsPruned { deleted } => serde_json::json!({
                "event": "backups_pruned",
                "command": "deploy",
                "deleted": deleted,
            }),

            DeployEvent::LockReleased { stack } => serde_json::json!({
                "event": "lock_released",
                "command": "deploy",
                "stack": stack,
            }),

            DeployEvent::Finished { outcome } => serde_json::json!({
                "event": "complete",
                "command": "deploy",
                "status": outcome,
                "exit_code": outcome.exit_code(),
            }),
        };

        self.write_event(json);
    }
}
