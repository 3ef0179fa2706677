//! InfraEngine port - the three-phase init/plan/apply contract
//!
//! `apply` takes the `ChangeSet` returned by `plan`; implementations must
//! apply that artifact and never re-plan.

use thiserror::Error;

use crate::domain::entities::ChangeSet;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary could not be started
    #[error("failed to run '{command}': {message}")]
    Spawn { command: String, message: String },

    /// The engine ran and reported failure
    #[error("'{command}' exited with {}: {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The plan artifact could not be inspected
    #[error("unreadable plan: {0}")]
    InvalidPlan(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

pub trait InfraEngine {
    fn init(&self) -> Result<(), EngineError>;

    fn plan(&self) -> Result<ChangeSet, EngineError>;

    fn apply(&self, change_set: &ChangeSet) -> Result<(), EngineError>;
}

impl<T: InfraEngine + ?Sized> InfraEngine for std::sync::Arc<T> {
    fn init(&self) -> Result<(), EngineError> {
        (**self).init()
    }

    fn plan(&self) -> Result<ChangeSet, EngineError> {
        (**self).plan()
    }

    fn apply(&self, change_set: &ChangeSet) -> Result<(), EngineError> {
        (**self).apply(change_set)
    }
}
