//! DeploymentLock entity - the mutual-exclusion record for one stack

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_objects::{ActorIdentity, StackName};

/// Lease held by one deployment run over one stack.
///
/// At most one non-expired record exists per `lock_id`; the store enforces
/// this with a create-if-absent write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentLock {
    pub lock_id: String,
    pub locked_by: String,
    pub expiry_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub stack_name: String,
}

impl DeploymentLock {
    pub fn new(
        stack: &StackName,
        actor: &ActorIdentity,
        now: DateTime<Utc>,
        lease: Duration,
    ) -> Self {
        Self {
            lock_id: stack.lock_id(),
            locked_by: actor.to_string(),
            expiry_time: now.checked_add_signed(lease).unwrap_or(DateTime::<Utc>::MAX_UTC),
            created_at: now,
            stack_name: stack.as_str().to_string(),
        }
    }

    /// A lock whose expiry is not in the future may be taken over
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time <= now
    }
}
