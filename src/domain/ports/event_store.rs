//! EventStore port - append-only store for deployment state events

use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::DeploymentStateEvent;
use crate::domain::value_objects::StackName;

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("event store unavailable: {0}")]
    Backend(String),

    #[error("malformed event record: {0}")]
    Malformed(String),
}

/// Append-only event log keyed by stack, queried newest first
pub trait EventStore: Send + Sync {
    fn put(&self, event: &DeploymentStateEvent) -> Result<(), EventStoreError>;

    /// Up to `limit` events for `stack`, newest first
    fn query(
        &self,
        stack: &StackName,
        limit: usize,
    ) -> Result<Vec<DeploymentStateEvent>, EventStoreError>;
}

impl<T: EventStore + ?Sized> EventStore for Arc<T> {
    fn put(&self, event: &DeploymentStateEvent) -> Result<(), EventStoreError> {
        (**self).put(event)
    }

    fn query(
        &self,
        stack: &StackName,
        limit: usize,
    ) -> Result<Vec<DeploymentStateEvent>, EventStoreError> {
        (**self).query(stack, limit)
    }
}
