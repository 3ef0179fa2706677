//! `stackkit deploy`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use stackkit::application::DeployOptions;
use stackkit::domain::ports::{DeployEventSink, FanoutEventSink, LockStore};
use stackkit::domain::value_objects::StackName;
use stackkit::infrastructure::{discover_context, InterruptReleaseSink, JsonEventSink};
use stackkit::presentation::factory;

use super::{load_config, OutputMode};
use crate::cli::AwsArgs;
use crate::ui::views::deploy::{render_deploy_summary, ConsoleEventSink};

pub fn cmd_deploy(
    stack: &str,
    aws: &AwsArgs,
    no_auto_rollback: bool,
    working_dir: Option<PathBuf>,
    output: OutputMode,
) -> Result<i32> {
    let stack = StackName::new(stack)?;

    let mut overrides = aws.to_overrides();
    overrides.working_dir = working_dir;
    if no_auto_rollback {
        overrides.auto_rollback = Some(false);
    }
    let config = load_config(&overrides)?;

    let context = discover_context(&config.terraform.working_dir);
    let lock_table = factory::create_lock_table(&config);

    let interrupt = {
        let table = lock_table.clone();
        Arc::new(InterruptReleaseSink::new(move |lock_id| {
            if let Err(e) = table.delete(lock_id) {
                warn!(lock_id = %lock_id, error = %e, "failed to release lock after interrupt");
            }
        }))
    };
    if let Err(e) = interrupt.install() {
        warn!(error = %e, "could not install interrupt handler");
    }

    let progress: Arc<dyn DeployEventSink> = if output.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout(
            output.caps.supports_color,
            output.caps.supports_unicode,
        ))
    };
    let sink = FanoutEventSink::new().with(interrupt).with(progress);

    let use_case = factory::create_deploy_use_case(&config, &stack, lock_table, !output.json)?
        .with_event_sink(Arc::new(sink));
    let options = DeployOptions::new(stack.clone(), context)
        .with_auto_rollback(config.deploy.auto_rollback);

    let report = use_case.execute(&options)?;
    if !output.json {
        print!(
            "{}",
            render_deploy_summary(
                stack.as_str(),
                &report,
                output.caps.supports_color,
                output.caps.supports_unicode,
            )
        );
    }
    Ok(report.exit_code())
}
