//! Domain Entities
//!
//! Records persisted in the lock table, the state-event table and the
//! state bucket, plus the reviewed change-set.

mod backup;
mod change_set;
mod lock;
mod state_event;

pub use backup::{StateBackup, BACKUP_TIMESTAMP_FORMAT};
pub use change_set::ChangeSet;
pub use lock::DeploymentLock;
pub use state_event::{DeploymentState, DeploymentStateEvent, UnknownState};
