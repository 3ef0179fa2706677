//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::io;
use std::sync::Arc;

use chrono::Duration;

use crate::application::{BackupCoordinator, DeployUseCase, LockManager, StateTracker};
use crate::config::Config;
use crate::domain::ports::SystemClock;
use crate::domain::value_objects::StackName;
use crate::infrastructure::{
    AwsCli, BackendConfig, DynamoLockTable, DynamoStateTable, S3Bucket, TerraformEngine,
};

/// Lock table shared between the lock manager and the interrupt hook
pub type AwsLockTable = Arc<DynamoLockTable<AwsCli>>;

pub type ConcreteLockManager = LockManager<AwsLockTable, SystemClock>;
pub type ConcreteStateTracker = StateTracker<DynamoStateTable<AwsCli>, SystemClock>;
pub type ConcreteBackupCoordinator = BackupCoordinator<S3Bucket<AwsCli>, SystemClock>;

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<
    AwsLockTable,
    DynamoStateTable<AwsCli>,
    S3Bucket<AwsCli>,
    TerraformEngine,
    SystemClock,
>;

fn aws_cli(config: &Config) -> AwsCli {
    AwsCli::new(&config.aws.binary, &config.aws.region)
}

pub fn create_lock_table(config: &Config) -> AwsLockTable {
    Arc::new(DynamoLockTable::new(aws_cli(config), &config.aws.lock_table))
}

pub fn create_lock_manager(config: &Config, table: AwsLockTable) -> ConcreteLockManager {
    LockManager::new(table, SystemClock)
        .with_lease(Duration::minutes(i64::from(config.deploy.lock_timeout_minutes)))
}

pub fn create_state_tracker(config: &Config) -> ConcreteStateTracker {
    StateTracker::new(
        DynamoStateTable::new(aws_cli(config), &config.aws.state_table),
        SystemClock,
    )
    .with_retention(Duration::days(i64::from(config.deploy.event_ttl_days)))
}

/// `None` when no state bucket is configured
pub fn create_backup_coordinator(config: &Config) -> Option<ConcreteBackupCoordinator> {
    config.aws.state_bucket.as_ref().map(|bucket| {
        BackupCoordinator::new(S3Bucket::new(aws_cli(config), bucket), SystemClock)
            .with_retention(config.deploy.backup_retention)
    })
}

/// Terraform pointed at the stack's live state object, when a bucket is set
pub fn create_engine(
    config: &Config,
    stack: &StackName,
    stream_output: bool,
) -> io::Result<TerraformEngine> {
    let engine = TerraformEngine::new(&config.terraform.binary, &config.terraform.working_dir)?
        .with_stream_output(stream_output);

    Ok(match &config.aws.state_bucket {
        Some(bucket) => engine.with_backend(BackendConfig {
            bucket: bucket.clone(),
            key: stack.state_key(),
            region: config.aws.region.clone(),
        }),
        None => engine,
    })
}

/// Create a deploy use case with all dependencies wired up
///
/// The caller keeps `lock_table` to release the lock from a signal handler.
pub fn create_deploy_use_case(
    config: &Config,
    stack: &StackName,
    lock_table: AwsLockTable,
    stream_output: bool,
) -> io::Result<ConcreteDeployUseCase> {
    Ok(DeployUseCase::new(
        create_lock_manager(config, lock_table),
        create_state_tracker(config),
        create_backup_coordinator(config),
        create_engine(config, stack, stream_output)?,
    ))
}
