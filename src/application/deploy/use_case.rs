//! Deploy Use Case
//!
//! Orchestrates one deployment run:
//! 1. Acquire the stack lock (held by a guard for the whole run)
//! 2. Snapshot the live state
//! 3. Init, then plan once
//! 4. Apply exactly the reviewed plan
//! 5. On apply failure, optionally restore the snapshot and re-converge
//!
//! Every transition is recorded through the state tracker. Only this use
//! case decides the overall outcome; the components it drives return typed
//! results and never exit.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::backup_coordinator::BackupCoordinator;
use crate::application::lock_manager::LockManager;
use crate::application::state_tracker::StateTracker;
use crate::domain::entities::{DeploymentState, StateBackup};
use crate::domain::ports::{
    Clock, DeployEvent, DeployEventSink, DeployPhase, EventStore, InfraEngine, LockStore,
    NoopEventSink, ObjectStore,
};
use crate::domain::value_objects::DeploymentOutcome;
use crate::error::{StackkitError, StackkitResult};

use super::options::DeployOptions;
use super::result::DeployReport;

/// Deploy use case - single-flight deployment with rollback
///
/// `backups` is `None` when no state bucket is configured; such runs never
/// snapshot and never roll back.
pub struct DeployUseCase<L, V, O, E, C>
where
    L: LockStore,
    V: EventStore,
    O: ObjectStore,
    E: InfraEngine,
    C: Clock,
{
    locks: LockManager<L, C>,
    tracker: StateTracker<V, C>,
    backups: Option<BackupCoordinator<O, C>>,
    engine: E,
    event_sink: Arc<dyn DeployEventSink>,
}

impl<L, V, O, E, C> DeployUseCase<L, V, O, E, C>
where
    L: LockStore,
    V: EventStore,
    O: ObjectStore,
    E: InfraEngine,
    C: Clock,
{
    pub fn new(
        locks: LockManager<L, C>,
        tracker: StateTracker<V, C>,
        backups: Option<BackupCoordinator<O, C>>,
        engine: E,
    ) -> Self {
        Self {
            locks,
            tracker,
            backups,
            engine,
            event_sink: Arc::new(NoopEventSink),
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn DeployEventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Run one deployment.
    ///
    /// `Err` means the run aborted before reaching the apply step (lock
    /// contention, snapshot, init or plan failure). Apply and rollback
    /// results are reported through `DeployReport::outcome`.
    pub fn execute(&self, options: &DeployOptions) -> StackkitResult<DeployReport> {
        let stack = &options.stack;
        let guard = self.locks.acquire_guard(stack, &options.context.actor)?;
        self.emit(DeployEvent::LockAcquired {
            stack: stack.to_string(),
            lock_id: guard.lock().lock_id.clone(),
            expiry: guard.lock().expiry_time,
        });

        let deployment_id = self.tracker.start_run(stack);
        info!(stack = %stack, deployment_id = %deployment_id, "deployment started");
        let result = self.run_locked(&deployment_id, options);

        drop(guard);
        self.emit(DeployEvent::LockReleased {
            stack: stack.to_string(),
        });

        let outcome = match &result {
            Ok(report) => report.outcome,
            Err(_) => DeploymentOutcome::Failure,
        };
        self.emit(DeployEvent::Finished { outcome });
        result
    }

    fn run_locked(
        &self,
        deployment_id: &str,
        options: &DeployOptions,
    ) -> StackkitResult<DeployReport> {
        let stack = &options.stack;
        let mut report = DeployReport::new(deployment_id, DeploymentOutcome::Failure);

        self.record(deployment_id, options, DeploymentState::Starting);

        // Backup
        self.emit(DeployEvent::PhaseStarted {
            phase: DeployPhase::BackingUp,
        });
        let backup = match &self.backups {
            Some(backups) => match backups.snapshot(stack) {
                Ok(backup) => backup,
                Err(e) => {
                    self.record(deployment_id, options, DeploymentState::Failed);
                    return Err(e);
                }
            },
            None => {
                warn!(stack = %stack, "no state bucket configured, skipping backup");
                None
            }
        };
        report.backup_key = backup.as_ref().map(|b| b.key().to_string());
        self.emit(DeployEvent::BackupTaken {
            key: report.backup_key.clone(),
        });

        // Init
        self.emit(DeployEvent::PhaseStarted {
            phase: DeployPhase::Initializing,
        });
        if let Err(source) = self.engine.init() {
            self.record(deployment_id, options, DeploymentState::Failed);
            return Err(StackkitError::Init {
                stack: stack.to_string(),
                source,
            });
        }

        // Plan
        self.record(deployment_id, options, DeploymentState::Planning);
        self.emit(DeployEvent::PhaseStarted {
            phase: DeployPhase::Planning,
        });
        let change_set = match self.engine.plan() {
            Ok(change_set) => change_set,
            Err(source) => {
                self.record(deployment_id, options, DeploymentState::Failed);
                return Err(StackkitError::Plan {
                    stack: stack.to_string(),
                    source,
                });
            }
        };
        report.resource_changes = change_set.resource_change_count();
        self.emit(DeployEvent::PlanReady {
            resource_changes: report.resource_changes,
        });

        if !change_set.has_changes() {
            info!(stack = %stack, "no changes to apply");
            self.record(deployment_id, options, DeploymentState::Completed);
            self.prune(options, backup.as_ref());
            report.outcome = DeploymentOutcome::Success;
            return Ok(report);
        }

        // Apply
        self.record(deployment_id, options, DeploymentState::Applying);
        self.emit(DeployEvent::PhaseStarted {
            phase: DeployPhase::Applying,
        });
        let apply_error = match self.engine.apply(&change_set) {
            Ok(()) => {
                info!(
                    stack = %stack,
                    resource_changes = report.resource_changes,
                    "deployment applied"
                );
                self.record(deployment_id, options, DeploymentState::Completed);
                self.prune(options, backup.as_ref());
                report.outcome = DeploymentOutcome::Success;
                return Ok(report);
            }
            Err(e) => e,
        };

        error!(stack = %stack, error = %apply_error, "apply failed");
        self.record(deployment_id, options, DeploymentState::Failed);
        report.apply_error = Some(apply_error.to_string());

        let (backups, backup) = match (&self.backups, backup) {
            (Some(backups), Some(backup)) if options.auto_rollback => (backups, backup),
            _ => {
                warn!(
                    stack = %stack,
                    auto_rollback = options.auto_rollback,
                    has_backup = report.backup_key.is_some(),
                    "rollback not attempted"
                );
                report.outcome = DeploymentOutcome::Failure;
                return Ok(report);
            }
        };

        let outcome = self.rollback(deployment_id, options, backups, &backup, &mut report);
        report.outcome = outcome;
        Ok(report)
    }

    /// Restore `backup` and re-converge to it
    fn rollback(
        &self,
        deployment_id: &str,
        options: &DeployOptions,
        backups: &BackupCoordinator<O, C>,
        backup: &StateBackup,
        report: &mut DeployReport,
    ) -> DeploymentOutcome {
        let stack = &options.stack;
        warn!(stack = %stack, backup = %backup.key(), "rolling back");
        self.record(deployment_id, options, DeploymentState::RollingBack);
        self.emit(DeployEvent::PhaseStarted {
            phase: DeployPhase::RollingBack,
        });

        let converged = backups
            .restore(stack, backup)
            .map_err(|e| e.chain())
            .and_then(|()| self.engine.plan().map_err(|e| e.to_string()))
            .and_then(|change_set| {
                if change_set.has_changes() {
                    self.engine.apply(&change_set).map_err(|e| e.to_string())
                } else {
                    Ok(())
                }
            });

        match converged {
            Ok(()) => {
                info!(stack = %stack, backup = %backup.key(), "rolled back");
                self.record(deployment_id, options, DeploymentState::RolledBack);
                DeploymentOutcome::RolledBack
            }
            Err(reason) => {
                error!(stack = %stack, error = %reason, "rollback failed, manual intervention required");
                self.record(deployment_id, options, DeploymentState::RollbackFailed);
                report.rollback_error = Some(reason);
                DeploymentOutcome::RollbackFailed
            }
        }
    }

    fn prune(&self, options: &DeployOptions, backup: Option<&StateBackup>) {
        if let (Some(backups), Some(_)) = (&self.backups, backup) {
            let deleted = backups.prune(&options.stack);
            self.emit(DeployEvent::BackupsPruned { deleted });
        }
    }

    fn record(&self, deployment_id: &str, options: &DeployOptions, state: DeploymentState) {
        self.tracker
            .record(deployment_id, &options.stack, state, &options.context);
    }

    fn emit(&self, event: DeployEvent) {
        self.event_sink.on_event(&event);
    }
}
