//! Deployment state events - the append-only lifecycle log

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::value_objects::{DeploymentContext, StackName};

/// Lifecycle state written at every orchestrator transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Starting,
    Planning,
    Applying,
    Completed,
    Failed,
    RollingBack,
    RolledBack,
    RollbackFailed,
}

impl DeploymentState {
    pub const ALL: [DeploymentState; 8] = [
        DeploymentState::Starting,
        DeploymentState::Planning,
        DeploymentState::Applying,
        DeploymentState::Completed,
        DeploymentState::Failed,
        DeploymentState::RollingBack,
        DeploymentState::RolledBack,
        DeploymentState::RollbackFailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentState::Starting => "starting",
            DeploymentState::Planning => "planning",
            DeploymentState::Applying => "applying",
            DeploymentState::Completed => "completed",
            DeploymentState::Failed => "failed",
            DeploymentState::RollingBack => "rolling_back",
            DeploymentState::RolledBack => "rolled_back",
            DeploymentState::RollbackFailed => "rollback_failed",
        }
    }

    /// No further events follow a terminal state within one run
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DeploymentState::Completed
                | DeploymentState::RolledBack
                | DeploymentState::RollbackFailed
        )
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized state string read back from the event store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment state '{0}'")]
pub struct UnknownState(pub String);

impl FromStr for DeploymentState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

/// One immutable lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentStateEvent {
    pub deployment_id: String,
    pub stack_name: String,
    pub state: DeploymentState,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub host: String,
    pub git_commit: String,
    /// Epoch seconds after which the store may drop the event
    pub ttl: i64,
}

impl DeploymentStateEvent {
    pub fn new(
        deployment_id: impl Into<String>,
        stack: &StackName,
        state: DeploymentState,
        context: &DeploymentContext,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            stack_name: stack.as_str().to_string(),
            state,
            timestamp: now,
            user: context.actor.user().to_string(),
            host: context.actor.host().to_string(),
            git_commit: context.git_commit.clone(),
            ttl: now
                .checked_add_signed(retention)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
        }
    }

    /// Identifier shared by every event of one orchestration run
    pub fn deployment_id_for(stack: &StackName, started_at: DateTime<Utc>) -> String {
        format!("{}-{}", stack, started_at.format("%Y%m%d-%H%M%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ActorIdentity;
    use chrono::TimeZone;

    #[test]
    fn oversized_retention_saturates_ttl() {
        let event = DeploymentStateEvent::new(
            "orders-20260301-120000",
            &StackName::new("orders").unwrap(),
            DeploymentState::Starting,
            &DeploymentContext::new(ActorIdentity::new("alice", "host1"), "abc1234"),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            Duration::days(4_294_967_295),
        );

        assert_eq!(event.ttl, DateTime::<Utc>::MAX_UTC.timestamp());
    }

    #[test]
    fn state_strings_round_trip() {
        for state in DeploymentState::ALL {
            assert_eq!(state.as_str().parse::<DeploymentState>().unwrap(), state);
        }
    }

    #[test]
    fn unknown_state_is_rejected() {
        let err = "exploded".parse::<DeploymentState>().unwrap_err();
        assert_eq!(err.to_string(), "unknown deployment state 'exploded'");
    }

    #[test]
    fn terminal_states() {
        assert!(DeploymentState::Completed.is_terminal());
        assert!(DeploymentState::RollbackFailed.is_terminal());
        assert!(!DeploymentState::Failed.is_terminal());
        assert!(!DeploymentState::Applying.is_terminal());
    }

    #[test]
    fn event_carries_context_and_ttl() {
        let stack = StackName::new("orders").unwrap();
        let ctx = DeploymentContext::new(ActorIdentity::new("alice", "host1"), "abc123");
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let id = DeploymentStateEvent::deployment_id_for(&stack, now);

        let event = DeploymentStateEvent::new(
            id,
            &stack,
            DeploymentState::Starting,
            &ctx,
            now,
            Duration::days(30),
        );

        assert_eq!(event.deployment_id, "orders-20260101-000000");
        assert_eq!(event.user, "alice");
        assert_eq!(event.host, "host1");
        assert_eq!(event.git_commit, "abc123");
        assert_eq!(event.ttl - now.timestamp(), 30 * 24 * 60 * 60);
    }
}
