//! Deployment outcome and its process exit code contract

use serde::Serialize;

/// Final result of a deployment run that got past lock acquisition,
/// init and plan.
///
/// Exit codes are consumed by calling scripts and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentOutcome {
    /// Applied cleanly, or nothing to apply
    Success,
    /// Apply failed and rollback was not attempted
    Failure,
    /// Apply failed and the previous state was re-converged
    RolledBack,
    /// Apply failed and rollback did not complete
    RollbackFailed,
}

impl DeploymentOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            DeploymentOutcome::Success => 0,
            DeploymentOutcome::Failure => 1,
            DeploymentOutcome::RolledBack => 2,
            DeploymentOutcome::RollbackFailed => 3,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, DeploymentOutcome::Success)
    }
}

impl std::fmt::Display for DeploymentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeploymentOutcome::Success => "success",
            DeploymentOutcome::Failure => "failure",
            DeploymentOutcome::RolledBack => "rolled back",
            DeploymentOutcome::RollbackFailed => "rollback failed",
        };
        f.write_str(s)
    }
}
