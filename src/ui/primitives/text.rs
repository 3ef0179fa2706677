use crossterm::style::Stylize;

use stackkit::domain::entities::DeploymentState;
use stackkit::domain::value_objects::DeploymentOutcome;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticColor {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

impl SemanticColor {
    pub fn for_outcome(outcome: DeploymentOutcome) -> Self {
        match outcome {
            DeploymentOutcome::Success => SemanticColor::Success,
            DeploymentOutcome::RolledBack => SemanticColor::Warning,
            DeploymentOutcome::Failure | DeploymentOutcome::RollbackFailed => SemanticColor::Error,
        }
    }

    pub fn for_state(state: DeploymentState) -> Self {
        match state {
            DeploymentState::Completed => SemanticColor::Success,
            DeploymentState::Failed | DeploymentState::RollbackFailed => SemanticColor::Error,
            DeploymentState::RollingBack | DeploymentState::RolledBack => SemanticColor::Warning,
            DeploymentState::Starting | DeploymentState::Planning | DeploymentState::Applying => {
                SemanticColor::Info
            }
        }
    }
}

/// Paint `text` when the terminal supports color
pub fn paint(text: &str, color: SemanticColor, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    let color = match color {
        SemanticColor::Success => theme::colors::SUCCESS,
        SemanticColor::Error => theme::colors::ERROR,
        SemanticColor::Warning => theme::colors::WARNING,
        SemanticColor::Info => theme::colors::INFO,
        SemanticColor::Dim => theme::colors::DIM,
    };
    format!("{}", text.with(color))
}

pub fn bold(text: &str, supports_color: bool) -> String {
    if supports_color {
        format!("{}", text.bold())
    } else {
        text.to_string()
    }
}
