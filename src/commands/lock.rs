//! `stackkit lock acquire|release`

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use stackkit::domain::value_objects::StackName;
use stackkit::infrastructure::discover_context;
use stackkit::presentation::factory;

use super::{load_config, OutputMode};
use crate::cli::AwsArgs;
use crate::ui::json::emit_event;
use crate::ui::json::events::{CompleteEvent, DataEvent};

#[derive(Serialize)]
struct LockData<'a> {
    stack: &'a str,
    lock_id: &'a str,
    locked_by: &'a str,
    expiry: String,
}

pub fn cmd_lock_acquire(
    stack: &str,
    timeout_minutes: u32,
    aws: &AwsArgs,
    output: OutputMode,
) -> Result<i32> {
    let stack = StackName::new(stack)?;
    let mut overrides = aws.to_overrides();
    overrides.lock_timeout_minutes = Some(timeout_minutes);
    let config = load_config(&overrides)?;

    let context = discover_context(&config.terraform.working_dir);
    let manager = factory::create_lock_manager(&config, factory::create_lock_table(&config));
    let lock = manager.acquire(&stack, &context.actor)?;

    if output.json {
        emit_event(&DataEvent::new(
            "lock",
            LockData {
                stack: stack.as_str(),
                lock_id: &lock.lock_id,
                locked_by: &lock.locked_by,
                expiry: lock.expiry_time.to_rfc3339(),
            },
        ))?;
        emit_event(&CompleteEvent::new("lock", 0))?;
    } else {
        println!("{}", lock.lock_id);
    }
    Ok(0)
}

/// Best effort: problems are logged and the exit code is always 0
pub fn cmd_lock_release(stack: &str, aws: &AwsArgs, output: OutputMode) -> Result<i32> {
    match release(stack, aws) {
        Ok(()) => {}
        Err(e) => warn!(stack = %stack, error = format!("{:#}", e), "lock release skipped"),
    }
    if output.json {
        emit_event(&CompleteEvent::new("lock", 0))?;
    }
    Ok(0)
}

fn release(stack: &str, aws: &AwsArgs) -> Result<()> {
    let stack = StackName::new(stack)?;
    let config = load_config(&aws.to_overrides())?;
    factory::create_lock_manager(&config, factory::create_lock_table(&config)).release(&stack);
    Ok(())
}
