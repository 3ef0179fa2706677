//! `stackkit backups`

use anyhow::{bail, Result};
use serde::Serialize;

use stackkit::domain::value_objects::StackName;
use stackkit::presentation::factory;

use super::{load_config, OutputMode};
use crate::cli::AwsArgs;
use crate::ui::json::emit_event;
use crate::ui::json::events::{CompleteEvent, DataEvent};
use crate::ui::views::backups::render_backups;

#[derive(Serialize)]
struct BackupEntry {
    key: String,
    taken_at: String,
}

#[derive(Serialize)]
struct BackupsData<'a> {
    stack: &'a str,
    retention: usize,
    backups: Vec<BackupEntry>,
}

pub fn cmd_backups(stack: &str, aws: &AwsArgs, output: OutputMode) -> Result<i32> {
    let stack = StackName::new(stack)?;
    let config = load_config(&aws.to_overrides())?;

    let Some(coordinator) = factory::create_backup_coordinator(&config) else {
        bail!("no state bucket configured (set aws.state_bucket, STACKKIT_STATE_BUCKET or --state-bucket)");
    };
    let backups = coordinator.list(&stack)?;

    if output.json {
        emit_event(&DataEvent::new(
            "backups",
            BackupsData {
                stack: stack.as_str(),
                retention: coordinator.retention(),
                backups: backups
                    .iter()
                    .map(|b| BackupEntry {
                        key: b.key().to_string(),
                        taken_at: b.taken_at().to_rfc3339(),
                    })
                    .collect(),
            },
        ))?;
        emit_event(&CompleteEvent::new("backups", 0))?;
    } else {
        print!(
            "{}",
            render_backups(
                stack.as_str(),
                &backups,
                coordinator.retention(),
                output.caps.supports_color,
                output.caps.supports_unicode,
            )
        );
    }
    Ok(0)
}
