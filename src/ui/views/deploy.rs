use std::io::{self, Write};
use std::sync::Mutex;

use stackkit::application::DeployReport;
use stackkit::domain::ports::{DeployEvent, DeployEventSink, DeployPhase};
use stackkit::domain::value_objects::DeploymentOutcome;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{bold, paint, SemanticColor};

/// Human progress lines for a deploy run
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    supports_color: bool,
    supports_unicode: bool,
}

impl ConsoleEventSink {
    pub fn stdout(supports_color: bool, supports_unicode: bool) -> Self {
        Self::with_writer(io::stdout(), supports_color, supports_unicode)
    }

    pub fn with_writer<W: Write + Send + 'static>(
        writer: W,
        supports_color: bool,
        supports_unicode: bool,
    ) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            supports_color,
            supports_unicode,
        }
    }

    fn line(&self, icon: Icon, message: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(
                writer,
                "{} {}",
                icon.colored(self.supports_color, self.supports_unicode),
                message
            );
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: &DeployEvent) {
        match event {
            DeployEvent::LockAcquired { stack, expiry, .. } => self.line(
                Icon::Lock,
                &format!(
                    "Locked {} until {}",
                    bold(stack, self.supports_color),
                    expiry.format("%H:%M:%S UTC")
                ),
            ),
            DeployEvent::PhaseStarted { phase } => {
                let (icon, label) = match phase {
                    DeployPhase::BackingUp => (Icon::Progress, "Backing up state"),
                    DeployPhase::Initializing => (Icon::Progress, "Initializing"),
                    DeployPhase::Planning => (Icon::Progress, "Planning"),
                    DeployPhase::Applying => (Icon::Progress, "Applying"),
                    DeployPhase::RollingBack => (Icon::Rollback, "Rolling back"),
                };
                self.line(icon, label);
            }
            DeployEvent::BackupTaken { key: Some(key) } => {
                self.line(Icon::Arrow, &format!("backup {}", key))
            }
            DeployEvent::BackupTaken { key: None } => {
                self.line(Icon::Arrow, "no existing state to back up")
            }
            DeployEvent::PlanReady { resource_changes: 0 } => {
                self.line(Icon::Arrow, "no changes")
            }
            DeployEvent::PlanReady { resource_changes } => {
                self.line(Icon::Arrow, &format!("{} resource change(s)", resource_changes))
            }
            DeployEvent::BackupsPruned { deleted: 0 } => {}
            DeployEvent::BackupsPruned { deleted } => {
                self.line(Icon::Arrow, &format!("pruned {} old backup(s)", deleted))
            }
            DeployEvent::LockReleased { stack } => {
                self.line(Icon::Lock, &format!("Released lock on {}", stack))
            }
            // Rendered by the command as a summary
            DeployEvent::Finished { .. } => {}
        }
    }
}

pub fn render_deploy_summary(
    stack: &str,
    report: &DeployReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let (icon, headline) = match report.outcome {
        DeploymentOutcome::Success => (Icon::Success, format!("Deployed {}", stack)),
        DeploymentOutcome::Failure => (Icon::Error, format!("Deployment of {} failed", stack)),
        DeploymentOutcome::RolledBack => (
            Icon::Rollback,
            format!("Deployment of {} failed and was rolled back", stack),
        ),
        DeploymentOutcome::RollbackFailed => (
            Icon::Error,
            format!("Deployment of {} failed and rollback failed", stack),
        ),
    };

    let mut out = format!(
        "{} {}\n",
        icon.colored(supports_color, supports_unicode),
        paint(
            &headline,
            SemanticColor::for_outcome(report.outcome),
            supports_color
        )
    );
    out.push_str(&format!("  deployment  {}\n", report.deployment_id));
    out.push_str(&format!("  changes     {}\n", report.resource_changes));
    if let Some(key) = &report.backup_key {
        out.push_str(&format!("  backup      {}\n", key));
    }
    if let Some(error) = &report.apply_error {
        out.push_str(&format!("  apply error {}\n", error));
    }
    if let Some(error) = &report.rollback_error {
        out.push_str(&format!("  rollback    {}\n", error));
    }
    if report.outcome == DeploymentOutcome::RollbackFailed {
        out.push_str(&format!(
            "{} Manual intervention required: the live state may be inconsistent\n",
            Icon::Warning.colored(supports_color, supports_unicode)
        ));
    }
    out
}
