//! Value Objects
//!
//! Immutable types with no identity beyond their value.

mod identity;
mod outcome;
mod stack_name;

pub use identity::{ActorIdentity, DeploymentContext};
pub use outcome::DeploymentOutcome;
pub use stack_name::StackName;
