//! Configuration module for StackKit
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STACKKIT_*, AWS_REGION, AWS_DEFAULT_REGION)
//! 3. Project config (./stackkit.toml)
//! 4. User config (~/.config/stackkit/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    apply_overrides, load, load_layers, user_config_path, with_env_overrides, ConfigWarning,
    PROJECT_CONFIG_FILE,
};
pub use types::{
    AwsConfig, Config, ConfigOverrides, DeployConfig, TerraformConfig, DEFAULT_LOCK_TABLE,
    DEFAULT_REGION, DEFAULT_STATE_TABLE, MAX_EVENT_TTL_DAYS,
};
