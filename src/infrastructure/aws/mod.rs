//! AWS adapters, driven through the `aws` CLI
//!
//! - `DynamoLockTable` - `LockStore`
//! - `DynamoStateTable` - `EventStore`
//! - `S3Bucket` - `ObjectStore`

mod cli;
mod item;
mod lock_table;
mod s3;
mod state_table;

#[cfg(test)]
mod testing;

pub use cli::{AwsCli, AwsError, AwsRunner};
pub use lock_table::DynamoLockTable;
pub use s3::S3Bucket;
pub use state_table::{DynamoStateTable, STACK_INDEX};
