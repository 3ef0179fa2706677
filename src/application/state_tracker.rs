//! State Tracker
//!
//! Best-effort lifecycle log. A telemetry outage must never block or fail a
//! deployment, so `record` swallows store errors after logging them.

use chrono::Duration;
use tracing::{debug, warn};

use crate::domain::entities::{DeploymentState, DeploymentStateEvent};
use crate::domain::ports::{Clock, EventStore, EventStoreError};
use crate::domain::value_objects::{DeploymentContext, StackName};

/// Default retention of state events
pub const DEFAULT_EVENT_TTL_DAYS: i64 = 30;

/// Default number of events returned by `query`
pub const DEFAULT_QUERY_LIMIT: usize = 10;

pub struct StateTracker<E, C>
where
    E: EventStore,
    C: Clock,
{
    store: E,
    clock: C,
    retention: Duration,
}

impl<E, C> StateTracker<E, C>
where
    E: EventStore,
    C: Clock,
{
    pub fn new(store: E, clock: C) -> Self {
        Self {
            store,
            clock,
            retention: Duration::days(DEFAULT_EVENT_TTL_DAYS),
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Mint the id shared by all events of one run
    pub fn start_run(&self, stack: &StackName) -> String {
        DeploymentStateEvent::deployment_id_for(stack, self.clock.now())
    }

    /// Append a lifecycle event; failures are logged, never returned
    pub fn record(
        &self,
        deployment_id: &str,
        stack: &StackName,
        state: DeploymentState,
        context: &DeploymentContext,
    ) {
        let event = DeploymentStateEvent::new(
            deployment_id,
            stack,
            state,
            context,
            self.clock.now(),
            self.retention,
        );

        match self.store.put(&event) {
            Ok(()) => debug!(stack = %stack, deployment_id, state = %state, "state recorded"),
            Err(e) => warn!(
                stack = %stack,
                deployment_id,
                state = %state,
                error = %e,
                "failed to record deployment state"
            ),
        }
    }

    /// Most recent events for `stack`, newest first
    pub fn query(
        &self,
        stack: &StackName,
        limit: usize,
    ) -> Result<Vec<DeploymentStateEvent>, EventStoreError> {
        let mut events = self.store.query(stack, limit)?;
        // Stores are expected to sort, but the contract is enforced here
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        Ok(events)
    }
}
