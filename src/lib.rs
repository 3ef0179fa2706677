//! StackKit - safe single-flight infrastructure deployments
//!
//! StackKit serializes Terraform deployments per stack with an expiring
//! DynamoDB lock, snapshots the live state to S3 before every apply, and
//! restores that snapshot when an apply fails. Every run leaves a trail of
//! state events that operators can query.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeployUseCase};
pub use config::{Config, ConfigOverrides, ConfigWarning};
pub use domain::value_objects::{DeploymentOutcome, StackName};
pub use error::{StackkitError, StackkitResult};
