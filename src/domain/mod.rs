//! Domain Layer
//!
//! Deployment records, value objects and the ports the orchestrator talks
//! through. Nothing here shells out or touches the network.
//!
//! ## Structure
//!
//! - `entities/` - Persisted records (DeploymentLock, DeploymentStateEvent, StateBackup)
//! - `value_objects/` - Immutable value types (StackName, ActorIdentity, DeploymentOutcome)
//! - `services/` - Pure domain services (terraform state validation)
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
