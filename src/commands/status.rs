//! `stackkit status`

use anyhow::{Context, Result};
use serde::Serialize;

use stackkit::domain::entities::DeploymentStateEvent;
use stackkit::domain::value_objects::StackName;
use stackkit::presentation::factory;

use super::{load_config, OutputMode};
use crate::cli::AwsArgs;
use crate::ui::json::emit_event;
use crate::ui::json::events::{CompleteEvent, DataEvent};
use crate::ui::views::status::render_status;

#[derive(Serialize)]
struct StatusData<'a> {
    stack: &'a str,
    events: &'a [DeploymentStateEvent],
}

pub fn cmd_status(
    stack: &str,
    limit: Option<usize>,
    aws: &AwsArgs,
    output: OutputMode,
) -> Result<i32> {
    let stack = StackName::new(stack)?;
    let config = load_config(&aws.to_overrides())?;
    let limit = limit.unwrap_or(config.deploy.status_limit);

    let events = factory::create_state_tracker(&config)
        .query(&stack, limit)
        .with_context(|| format!("failed to query state events for stack '{}'", stack))?;

    if output.json {
        emit_event(&DataEvent::new(
            "status",
            StatusData {
                stack: stack.as_str(),
                events: &events,
            },
        ))?;
        emit_event(&CompleteEvent::new("status", 0))?;
    } else {
        print!(
            "{}",
            render_status(stack.as_str(), &events, output.caps.supports_color)
        );
    }
    Ok(0)
}
