//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `aws/` - DynamoDB lock and state tables, S3 state bucket
//! - `terraform` - Init/plan/apply engine
//! - `events/` - Deploy event sinks
//! - `signals` - Interrupt-driven lock release
//! - `identity` - Actor and git commit discovery
//! - `memory` - In-process stores for tests and dry wiring

pub mod aws;
pub mod events;
pub mod identity;
pub mod memory;
pub mod signals;
pub mod terraform;

// Re-export for convenience
pub use aws::{AwsCli, DynamoLockTable, DynamoStateTable, S3Bucket};
pub use events::JsonEventSink;
pub use identity::discover_context;
pub use signals::{InterruptReleaseSink, INTERRUPTED_EXIT_CODE};
pub use terraform::{BackendConfig, TerraformEngine};
