//! StackKit CLI - safe single-flight infrastructure deployments
//!
//! Usage: stackkit <COMMAND>
//!
//! Commands:
//!   deploy   Lock, back up, plan and apply a stack
//!   lock     Acquire or release a deployment lock by hand
//!   status   Recent state events for a stack
//!   backups  Retained state backups for a stack
//!
//! Exit codes: 0 success, 1 failure, 2 rolled back, 3 rollback failed.

mod cli;
mod commands;
mod ui;

use clap::Parser;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, LockAction};
use commands::OutputMode;
use ui::json::emit_event;
use ui::json::events::ErrorEvent;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Exit code 2 means "rolled back"; usage errors are plain failures
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };
    init_tracing(cli.verbose);

    let output = OutputMode::detect(cli.json);
    let command = command_name(&cli.command);

    let result = match &cli.command {
        Commands::Deploy {
            stack,
            aws,
            no_auto_rollback,
            working_dir,
        } => commands::deploy::cmd_deploy(
            stack,
            aws,
            *no_auto_rollback,
            working_dir.clone(),
            output,
        ),
        Commands::Lock { action } => match action {
            LockAction::Acquire {
                stack,
                timeout_minutes,
                aws,
            } => commands::lock::cmd_lock_acquire(stack, *timeout_minutes, aws, output),
            LockAction::Release { stack, aws } => {
                commands::lock::cmd_lock_release(stack, aws, output)
            }
        },
        Commands::Status { stack, limit, aws } => {
            commands::status::cmd_status(stack, *limit, aws, output)
        }
        Commands::Backups { stack, aws } => commands::backups::cmd_backups(stack, aws, output),
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            if output.json {
                let _ = emit_event(&ErrorEvent::new(
                    command,
                    commands::error_code(&err),
                    format!("{:#}", err),
                ));
            } else {
                eprintln!("Error: {:#}", err);
            }
            1
        }
    };
    std::process::exit(code);
}

/// `RUST_LOG` wins unless `-v` is given; logs always go to stderr
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stackkit=info")),
        1 => EnvFilter::new("stackkit=debug"),
        _ => EnvFilter::new("stackkit=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Deploy { .. } => "deploy",
        Commands::Lock { .. } => "lock",
        Commands::Status { .. } => "status",
        Commands::Backups { .. } => "backups",
    }
}
