//! Application Layer
//!
//! Use cases that orchestrate the deployment flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT talk to AWS or Terraform directly
//! - Decides the overall outcome of a run
//!
//! ## Components
//!
//! - `LockManager` - Exclusive, expiring per-stack lock
//! - `StateTracker` - Best-effort lifecycle event log
//! - `BackupCoordinator` - Snapshot, restore, prune live state
//! - `DeployUseCase` - The deployment state machine

pub mod backup_coordinator;
pub mod deploy;
pub mod lock_manager;
pub mod state_tracker;

pub use backup_coordinator::{BackupCoordinator, DEFAULT_RETENTION};
pub use deploy::{DeployOptions, DeployReport, DeployUseCase};
pub use lock_manager::{LockGuard, LockManager, DEFAULT_LEASE_MINUTES};
pub use state_tracker::{StateTracker, DEFAULT_EVENT_TTL_DAYS, DEFAULT_QUERY_LIMIT};
