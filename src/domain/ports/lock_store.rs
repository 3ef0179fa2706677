//! LockStore port - conditional-write key-value store for deployment locks
//!
//! The only correctness boundary of the locking protocol is
//! `put_if_absent`: implementations must make it atomic.

use std::sync::Arc;

use crate::domain::entities::DeploymentLock;

/// Lock store operation errors
#[derive(Debug)]
pub enum LockStoreError {
    /// Conditional create lost: a record with this key already exists
    AlreadyExists,
    /// Record exists but cannot be decoded into a lock
    Malformed(String),
    /// Transport or service error
    Backend(String),
}

impl std::fmt::Display for LockStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockStoreError::AlreadyExists => write!(f, "lock record already exists"),
            LockStoreError::Malformed(msg) => write!(f, "malformed lock record: {}", msg),
            LockStoreError::Backend(msg) => write!(f, "lock store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for LockStoreError {}

/// Abstract lock table
///
/// Implementations:
/// - `DynamoLockTable` - DynamoDB via the `aws` CLI
/// - `MemoryLockStore` - in-process, for tests
pub trait LockStore: Send + Sync {
    /// Read the lock record, if any
    fn get(&self, lock_id: &str) -> Result<Option<DeploymentLock>, LockStoreError>;

    /// Create the record only if no record with the same `lock_id` exists.
    ///
    /// Returns `LockStoreError::AlreadyExists` when the condition fails.
    fn put_if_absent(&self, lock: &DeploymentLock) -> Result<(), LockStoreError>;

    /// Delete the record; deleting a missing record succeeds
    fn delete(&self, lock_id: &str) -> Result<(), LockStoreError>;

    /// Delete the record only if it is still exactly `observed`.
    ///
    /// Used to clear a stale lock without clobbering a lock a concurrent
    /// acquirer created in the meantime. A changed or missing record is
    /// not an error.
    fn delete_if_unchanged(&self, observed: &DeploymentLock) -> Result<(), LockStoreError>;
}

impl<T: LockStore + ?Sized> LockStore for Arc<T> {
    fn get(&self, lock_id: &str) -> Result<Option<DeploymentLock>, LockStoreError> {
        (**self).get(lock_id)
    }

    fn put_if_absent(&self, lock: &DeploymentLock) -> Result<(), LockStoreError> {
        (**self).put_if_absent(lock)
    }

    fn delete(&self, lock_id: &str) -> Result<(), LockStoreError> {
        (**self).delete(lock_id)
    }

    fn delete_if_unchanged(&self, observed: &DeploymentLock) -> Result<(), LockStoreError> {
        (**self).delete_if_unchanged(observed)
    }
}
