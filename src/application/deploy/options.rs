//! Deploy Options

use crate::domain::value_objects::{DeploymentContext, StackName};

/// Inputs for one deployment run
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Stack to deploy
    pub stack: StackName,
    /// Who is deploying and at which commit
    pub context: DeploymentContext,
    /// Restore and re-converge the previous state when apply fails
    pub auto_rollback: bool,
}

impl DeployOptions {
    pub fn new(stack: StackName, context: DeploymentContext) -> Self {
        Self {
            stack,
            context,
            auto_rollback: true,
        }
    }

    pub fn with_auto_rollback(mut self, enabled: bool) -> Self {
        self.auto_rollback = enabled;
        self
    }
}
