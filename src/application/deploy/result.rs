//! Deploy Result

use crate::domain::value_objects::DeploymentOutcome;

/// Report of a run that reached an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    /// Id shared by every state event of this run
    pub deployment_id: String,
    pub outcome: DeploymentOutcome,
    /// Snapshot taken before planning, if the stack had state
    pub backup_key: Option<String>,
    /// Resource changes in the reviewed plan
    pub resource_changes: usize,
    /// Apply error that triggered the failure path
    pub apply_error: Option<String>,
    /// Why rollback did not complete
    pub rollback_error: Option<String>,
}

impl DeployReport {
    pub fn new(deployment_id: impl Into<String>, outcome: DeploymentOutcome) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            outcome,
            backup_key: None,
            resource_changes: 0,
            apply_error: None,
            rollback_error: None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}
