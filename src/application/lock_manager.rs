//! Lock Manager
//!
//! Exclusive, expiring deployment lock per stack:
//! 1. Read the current record
//! 2. Live record → `LockHeld`
//! 3. Expired record → advisory delete (only if unchanged)
//! 4. Conditional create; losing the create → `LockHeld`
//!
//! There is no retry. Contention is reported to the caller immediately.

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::entities::DeploymentLock;
use crate::domain::ports::{Clock, LockStore, LockStoreError};
use crate::domain::value_objects::{ActorIdentity, StackName};
use crate::error::{StackkitError, StackkitResult};

/// Default lease length
pub const DEFAULT_LEASE_MINUTES: i64 = 30;

pub struct LockManager<S, C>
where
    S: LockStore,
    C: Clock,
{
    store: S,
    clock: C,
    lease: Duration,
}

impl<S, C> LockManager<S, C>
where
    S: LockStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            lease: Duration::minutes(DEFAULT_LEASE_MINUTES),
        }
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn lease(&self) -> Duration {
        self.lease
    }

    /// Take the lock for `stack`, or fail with `LockHeld`
    pub fn acquire(
        &self,
        stack: &StackName,
        actor: &ActorIdentity,
    ) -> StackkitResult<DeploymentLock> {
        let lock_id = stack.lock_id();
        let now = self.clock.now();

        let existing = self
            .store
            .get(&lock_id)
            .map_err(|source| StackkitError::LockStore {
                stack: stack.to_string(),
                source,
            })?;

        if let Some(existing) = existing {
            if !existing.is_expired(now) {
                return Err(StackkitError::LockHeld {
                    stack: stack.to_string(),
                    locked_by: existing.locked_by,
                    expiry: existing.expiry_time,
                });
            }

            warn!(
                stack = %stack,
                locked_by = %existing.locked_by,
                expired_at = %existing.expiry_time,
                "removing stale deployment lock"
            );
            if let Err(e) = self.store.delete_if_unchanged(&existing) {
                warn!(stack = %stack, error = %e, "failed to remove stale lock");
            }
        }

        let lock = DeploymentLock::new(stack, actor, now, self.lease);
        match self.store.put_if_absent(&lock) {
            Ok(()) => {
                info!(
                    stack = %stack,
                    lock_id = %lock.lock_id,
                    expires = %lock.expiry_time,
                    "deployment lock acquired"
                );
                Ok(lock)
            }
            Err(LockStoreError::AlreadyExists) => {
                debug!(stack = %stack, "lost conditional create to a concurrent acquirer");
                let winner = self.store.get(&lock_id).ok().flatten();
                Err(StackkitError::LockHeld {
                    stack: stack.to_string(),
                    locked_by: winner
                        .as_ref()
                        .map(|l| l.locked_by.clone())
                        .unwrap_or_else(|| "another deployment".to_string()),
                    expiry: winner.map(|l| l.expiry_time).unwrap_or(lock.expiry_time),
                })
            }
            Err(source) => Err(StackkitError::LockStore {
                stack: stack.to_string(),
                source,
            }),
        }
    }

    /// Delete the lock record. Never fails; a missing record is fine.
    pub fn release(&self, stack: &StackName) {
        match self.store.delete(&stack.lock_id()) {
            Ok(()) => info!(stack = %stack, "deployment lock released"),
            Err(e) => warn!(stack = %stack, error = %e, "failed to release deployment lock"),
        }
    }

    /// Acquire and return a guard that releases on drop
    pub fn acquire_guard(
        &self,
        stack: &StackName,
        actor: &ActorIdentity,
    ) -> StackkitResult<LockGuard<'_, S, C>> {
        let lock = self.acquire(stack, actor)?;
        Ok(LockGuard {
            manager: self,
            stack: stack.clone(),
            lock,
        })
    }
}

/// Scoped ownership of a deployment lock.
///
/// Dropping the guard releases the lock, on every exit path including
/// early returns and unwinding panics.
pub struct LockGuard<'a, S, C>
where
    S: LockStore,
    C: Clock,
{
    manager: &'a LockManager<S, C>,
    stack: StackName,
    lock: DeploymentLock,
}

impl<S, C> LockGuard<'_, S, C>
where
    S: LockStore,
    C: Clock,
{
    pub fn lock(&self) -> &DeploymentLock {
        &self.lock
    }
}

impl<S, C> Drop for LockGuard<'_, S, C>
where
    S: LockStore,
    C: Clock,
{
    fn drop(&mut self) {
        self.manager.release(&self.stack);
    }
}
