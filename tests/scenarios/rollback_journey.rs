//! A stack's life across several deployments: first deploy, routine
//! change, failed change rolled back, and the trail left in the state table.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use stackkit::application::{
    BackupCoordinator, DeployOptions, DeployUseCase, LockManager, StateTracker,
};
use stackkit::domain::entities::{ChangeSet, DeploymentState};
use stackkit::domain::ports::{EngineError, InfraEngine};
use stackkit::domain::value_objects::{
    ActorIdentity, DeploymentContext, DeploymentOutcome, StackName,
};
use stackkit::infrastructure::memory::{
    MemoryEventStore, MemoryLockStore, MemoryObjectStore, SteppingClock,
};

/// Terraform stand-in that keeps its state in the bucket like the S3 backend
struct FakeTerraform {
    bucket: Arc<MemoryObjectStore>,
    state_key: String,
    serial: AtomicU64,
    plans: AtomicUsize,
    pending: Mutex<VecDeque<usize>>,
    failing_applies: AtomicUsize,
}

impl FakeTerraform {
    fn new(bucket: Arc<MemoryObjectStore>, stack: &StackName) -> Self {
        Self {
            bucket,
            state_key: stack.state_key(),
            serial: AtomicU64::new(0),
            plans: AtomicUsize::new(0),
            pending: Mutex::new(VecDeque::new()),
            failing_applies: AtomicUsize::new(0),
        }
    }

    /// Change counts the next plans will report
    fn will_plan(&self, counts: &[usize]) {
        self.pending.lock().unwrap().extend(counts);
    }

    fn fail_next_apply(&self) {
        self.failing_applies.fetch_add(1, Ordering::SeqCst);
    }

    fn write_state(&self) {
        let serial = self.serial.fetch_add(1, Ordering::SeqCst) + 1;
        self.bucket.put(
            self.state_key.clone(),
            format!(
                r#"{{"version":4,"terraform_version":"1.7.5","serial":{},"lineage":"3f0c","resources":[]}}"#,
                serial
            ),
        );
    }

    fn live_serial(&self) -> u64 {
        let content = self.bucket.get(&self.state_key).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&content).unwrap();
        doc["serial"].as_u64().unwrap()
    }
}

impl InfraEngine for FakeTerraform {
    fn init(&self) -> Result<(), EngineError> {
        Ok(())
    }

    fn plan(&self) -> Result<ChangeSet, EngineError> {
        let n = self.plans.fetch_add(1, Ordering::SeqCst);
        let changes = self.pending.lock().unwrap().pop_front().unwrap_or(0);
        Ok(ChangeSet::new(format!("/plans/{}.tfplan", n), changes))
    }

    fn apply(&self, _change_set: &ChangeSet) -> Result<(), EngineError> {
        // Partial applies still bump the state serial
        self.write_state();
        if self
            .failing_applies
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(EngineError::CommandFailed {
                command: "terraform apply".to_string(),
                code: Some(1),
                stderr: "Error: creating IAM role: AccessDenied".to_string(),
            });
        }
        Ok(())
    }
}

#[test]
fn stack_lifecycle_with_rollback() {
    let clock = Arc::new(SteppingClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        Duration::seconds(1),
    ));
    let locks = Arc::new(MemoryLockStore::new());
    let events = Arc::new(MemoryEventStore::new());
    let bucket = Arc::new(MemoryObjectStore::new());
    let stack = StackName::new("payments").unwrap();
    let terraform = Arc::new(FakeTerraform::new(bucket.clone(), &stack));

    let use_case = DeployUseCase::new(
        LockManager::new(locks.clone(), clock.clone()),
        StateTracker::new(events.clone(), clock.clone()),
        Some(BackupCoordinator::new(bucket.clone(), clock.clone())),
        terraform.clone(),
    );
    let options = DeployOptions::new(
        stack.clone(),
        DeploymentContext::new(ActorIdentity::new("dana", "ci-3"), "a1b2c3d"),
    );

    // 1. First deploy: nothing to back up, creates the state
    terraform.will_plan(&[4]);
    let first = use_case.execute(&options).unwrap();
    assert_eq!(first.outcome, DeploymentOutcome::Success);
    assert_eq!(first.backup_key, None);
    assert_eq!(terraform.live_serial(), 1);

    // 2. Routine change: backed up, applied
    terraform.will_plan(&[1]);
    let second = use_case.execute(&options).unwrap();
    assert_eq!(second.outcome, DeploymentOutcome::Success);
    assert!(second.backup_key.is_some());
    assert_eq!(terraform.live_serial(), 2);

    // 3. Failing change: apply breaks halfway, the serial-2 backup comes back
    terraform.will_plan(&[2, 0]);
    terraform.fail_next_apply();
    let third = use_case.execute(&options).unwrap();
    assert_eq!(third.outcome, DeploymentOutcome::RolledBack);
    assert_eq!(third.exit_code(), 2);
    assert!(third.apply_error.as_deref().unwrap().contains("AccessDenied"));
    assert_eq!(terraform.live_serial(), 2);

    // Lock is free again after every run
    assert!(locks.is_empty());

    // 4. The trail, newest first
    let tracker = StateTracker::new(events.clone(), clock.clone());
    let trail: Vec<DeploymentState> = tracker
        .query(&stack, 5)
        .unwrap()
        .into_iter()
        .map(|e| e.state)
        .collect();
    assert_eq!(
        trail,
        vec![
            DeploymentState::RolledBack,
            DeploymentState::RollingBack,
            DeploymentState::Failed,
            DeploymentState::Applying,
            DeploymentState::Planning,
        ]
    );

    // Three runs, three deployment ids
    let mut ids: Vec<String> = events.all().into_iter().map(|e| e.deployment_id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    // Backups from runs 2 and 3 are both retained
    let backups = BackupCoordinator::new(bucket.clone(), clock.clone())
        .list(&stack)
        .unwrap();
    assert_eq!(backups.len(), 2);
    assert_eq!(Some(backups[0].key()), third.backup_key.as_deref());
}
