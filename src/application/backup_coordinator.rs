//! Backup Coordinator
//!
//! Snapshots `{stack}.tfstate` before any mutation, restores it during
//! rollback, and prunes old snapshots after a successful run.

use tracing::{info, warn};

use crate::domain::entities::StateBackup;
use crate::domain::ports::{Clock, ObjectStore, ObjectStoreError};
use crate::domain::services::validate_state;
use crate::domain::value_objects::StackName;
use crate::error::{StackkitError, StackkitResult};

/// Default number of backups kept per stack
pub const DEFAULT_RETENTION: usize = 5;

pub struct BackupCoordinator<O, C>
where
    O: ObjectStore,
    C: Clock,
{
    store: O,
    clock: C,
    retention: usize,
}

impl<O, C> BackupCoordinator<O, C>
where
    O: ObjectStore,
    C: Clock,
{
    pub fn new(store: O, clock: C) -> Self {
        Self {
            store,
            clock,
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Copy the live state to a timestamped backup.
    ///
    /// Returns `None` when the stack has no state yet (first deployment).
    pub fn snapshot(&self, stack: &StackName) -> StackkitResult<Option<StateBackup>> {
        let live = stack.state_key();
        let exists = self
            .store
            .exists(&live)
            .map_err(|source| backup_error(stack, source))?;
        if !exists {
            info!(stack = %stack, key = %live, "no existing state, skipping backup");
            return Ok(None);
        }

        let backup = StateBackup::for_stack(stack, self.clock.now());
        match self.store.copy(&live, backup.key()) {
            Ok(()) => {
                info!(stack = %stack, backup = %backup.key(), "state backed up");
                Ok(Some(backup))
            }
            // Deleted between the existence check and the copy
            Err(ObjectStoreError::NotFound(_)) => {
                info!(stack = %stack, key = %live, "state disappeared, skipping backup");
                Ok(None)
            }
            Err(source) => Err(backup_error(stack, source)),
        }
    }

    /// Copy `backup` back over the live state.
    ///
    /// The backup must exist and parse as a Terraform state; anything else
    /// is fatal because restore only runs mid-rollback.
    pub fn restore(&self, stack: &StackName, backup: &StateBackup) -> StackkitResult<()> {
        let content = self
            .store
            .read(backup.key())
            .map_err(|source| backup_error(stack, source))?;

        let summary = validate_state(&content).map_err(|reason| StackkitError::InvalidBackup {
            key: backup.key().to_string(),
            reason,
        })?;
        for warning in &summary.warnings {
            warn!(stack = %stack, backup = %backup.key(), "{}", warning);
        }

        self.store
            .copy(backup.key(), &stack.state_key())
            .map_err(|source| backup_error(stack, source))?;

        info!(
            stack = %stack,
            backup = %backup.key(),
            serial = summary.serial,
            resources = summary.resource_count,
            sha256 = %summary.sha256,
            "state restored from backup"
        );
        Ok(())
    }

    /// Backups of `stack`, newest first
    pub fn list(&self, stack: &StackName) -> StackkitResult<Vec<StateBackup>> {
        let objects = self
            .store
            .list(&stack.backup_prefix())
            .map_err(|source| backup_error(stack, source))?;

        let mut backups: Vec<StateBackup> = objects
            .iter()
            .filter_map(|obj| StateBackup::parse(stack, &obj.key))
            .collect();
        backups.sort_by(|a, b| b.cmp(a));
        Ok(backups)
    }

    /// Delete all but the newest `retention` backups.
    ///
    /// Cosmetic cleanup: failures are logged and the count of deleted
    /// backups is returned.
    pub fn prune(&self, stack: &StackName) -> usize {
        let backups = match self.list(stack) {
            Ok(backups) => backups,
            Err(e) => {
                warn!(stack = %stack, error = %e.chain(), "failed to list backups for pruning");
                return 0;
            }
        };

        let mut deleted = 0;
        for backup in backups.iter().skip(self.retention) {
            match self.store.delete(backup.key()) {
                Ok(()) => deleted += 1,
                Err(e) => warn!(
                    stack = %stack,
                    backup = %backup.key(),
                    error = %e,
                    "failed to delete old backup"
                ),
            }
        }

        if deleted > 0 {
            info!(stack = %stack, deleted, kept = self.retention, "old backups pruned");
        }
        deleted
    }
}

fn backup_error(stack: &StackName, source: ObjectStoreError) -> StackkitError {
    StackkitError::Backup {
        stack: stack.to_string(),
        source,
    }
}
