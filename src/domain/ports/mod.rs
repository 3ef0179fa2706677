//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod clock;
pub mod deploy_events;
pub mod event_store;
pub mod infra_engine;
pub mod lock_store;
pub mod object_store;

pub use clock::{Clock, SystemClock};
pub use deploy_events::{DeployEvent, DeployEventSink, DeployPhase, FanoutEventSink, NoopEventSink};
pub use event_store::{EventStore, EventStoreError};
pub use infra_engine::{EngineError, InfraEngine};
pub use lock_store::{LockStore, LockStoreError};
pub use object_store::{ObjectInfo, ObjectStore, ObjectStoreError};
