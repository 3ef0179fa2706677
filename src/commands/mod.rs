//! Command handlers for the `stackkit` binary.
//!
//! Each handler returns the process exit code; `Err` is reported by `main`
//! and exits 1.

pub mod backups;
pub mod deploy;
pub mod lock;
pub mod status;

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use stackkit::config::{self, Config, ConfigOverrides};
use stackkit::StackkitError;

use crate::cli::AwsArgs;
use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};

/// Per-invocation output settings
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub caps: TerminalCapabilities,
}

impl OutputMode {
    pub fn detect(json: bool) -> Self {
        Self {
            json,
            caps: detect_capabilities(),
        }
    }
}

impl AwsArgs {
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            region: self.region.clone(),
            lock_table: self.lock_table.clone(),
            state_table: self.state_table.clone(),
            state_bucket: self.state_bucket.clone(),
            ..Default::default()
        }
    }
}

/// Load every config layer from the current directory, then apply `overrides`
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let (config, warnings) = config::load(Path::new("."))?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    Ok(config::apply_overrides(config, overrides)?)
}

/// Stable machine-readable code for an error, used in `--json` mode
pub fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<StackkitError>() {
        Some(StackkitError::LockHeld { .. }) => "LOCK_HELD",
        Some(StackkitError::LockStore { .. }) => "LOCK_STORE",
        Some(StackkitError::InvalidStackName { .. }) => "INVALID_STACK_NAME",
        Some(StackkitError::Init { .. }) => "INIT_FAILED",
        Some(StackkitError::Plan { .. }) => "PLAN_FAILED",
        Some(StackkitError::Backup { .. }) => "BACKUP_FAILED",
        Some(StackkitError::InvalidBackup { .. }) => "INVALID_BACKUP",
        Some(StackkitError::InvalidConfig { .. }) => "INVALID_CONFIG",
        Some(StackkitError::Io(_)) => "IO",
        None => "ERROR",
    }
}
