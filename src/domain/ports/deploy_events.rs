//! Deploy Event Port
//!
//! Provides an observable interface for deployment runs.
//! Enables progress reporting, JSON event streams, and the interrupt hook
//! that releases the lock on Ctrl+C.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::value_objects::DeploymentOutcome;

/// Orchestrator phase, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    BackingUp,
    Initializing,
    Planning,
    Applying,
    RollingBack,
}

impl DeployPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            DeployPhase::BackingUp => "backing_up",
            DeployPhase::Initializing => "initializing",
            DeployPhase::Planning => "planning",
            DeployPhase::Applying => "applying",
            DeployPhase::RollingBack => "rolling_back",
        }
    }
}

/// Event emitted during a deployment run
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Lock taken; the run now owns the stack
    LockAcquired {
        stack: String,
        lock_id: String,
        expiry: DateTime<Utc>,
    },

    /// Entering a phase
    PhaseStarted { phase: DeployPhase },

    /// Snapshot taken (`None` on a first deployment)
    BackupTaken { key: Option<String> },

    /// Plan finished
    PlanReady { resource_changes: usize },

    /// Backups beyond the retention count were deleted
    BackupsPruned { deleted: usize },

    /// Lock released (always emitted once per acquired lock)
    LockReleased { stack: String },

    /// Run finished with an outcome
    Finished { outcome: DeploymentOutcome },
}

/// Trait for receiving deploy events
///
/// Implementations:
/// - ConsoleEventSink: progress lines in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - InterruptReleaseSink: arms the signal-driven lock release
/// - NoopEventSink: silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: &DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: &DeployEvent) {}
}

/// Forwards every event to each inner sink, in order
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn DeployEventSink>>,
}

impl FanoutEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn DeployEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl DeployEventSink for FanoutEventSink {
    fn on_event(&self, event: &DeployEvent) {
        for sink in &self.sinks {
            sink.on_event(event);
        }
    }
}
