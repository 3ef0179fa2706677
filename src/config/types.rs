//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::{
    DEFAULT_EVENT_TTL_DAYS, DEFAULT_LEASE_MINUTES, DEFAULT_QUERY_LIMIT, DEFAULT_RETENTION,
};

pub const DEFAULT_REGION: &str = "ap-northeast-2";
pub const DEFAULT_LOCK_TABLE: &str = "stackkit-deployment-locks";
pub const DEFAULT_STATE_TABLE: &str = "stackkit-deployment-states";

/// Ten years; longer retention is certainly a typo
pub const MAX_EVENT_TTL_DAYS: u32 = 3650;

/// AWS resources the orchestrator talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_lock_table")]
    pub lock_table: String,

    #[serde(default = "default_state_table")]
    pub state_table: String,

    /// Without a bucket, deployments run with no snapshot and no rollback
    #[serde(default)]
    pub state_bucket: Option<String>,

    /// Path or name of the `aws` CLI
    #[serde(default = "default_aws_bin")]
    pub binary: PathBuf,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            lock_table: default_lock_table(),
            state_table: default_state_table(),
            state_bucket: None,
            binary: default_aws_bin(),
        }
    }
}

/// Orchestrator tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_minutes: u32,

    #[serde(default = "default_retention")]
    pub backup_retention: usize,

    #[serde(default = "default_event_ttl")]
    pub event_ttl_days: u32,

    #[serde(default = "default_true")]
    pub auto_rollback: bool,

    #[serde(default = "default_status_limit")]
    pub status_limit: usize,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            lock_timeout_minutes: default_lock_timeout(),
            backup_retention: default_retention(),
            event_ttl_days: default_event_ttl(),
            auto_rollback: true,
            status_limit: default_status_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerraformConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_terraform_bin")]
    pub binary: PathBuf,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            binary: default_terraform_bin(),
        }
    }
}

/// Main configuration structure
///
/// ```toml
/// [aws]
/// region = "ap-northeast-2"
/// state_bucket = "acme-tfstate"
///
/// [deploy]
/// backup_retention = 5
/// auto_rollback = true
///
/// [terraform]
/// working_dir = "infra"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub terraform: TerraformConfig,
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub region: Option<String>,
    pub lock_table: Option<String>,
    pub state_table: Option<String>,
    pub state_bucket: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub lock_timeout_minutes: Option<u32>,
    pub auto_rollback: Option<bool>,
}

impl Config {
    /// Apply command-line values on top of every other layer
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(region) = &overrides.region {
            self.aws.region = region.clone();
        }
        if let Some(table) = &overrides.lock_table {
            self.aws.lock_table = table.clone();
        }
        if let Some(table) = &overrides.state_table {
            self.aws.state_table = table.clone();
        }
        if let Some(bucket) = &overrides.state_bucket {
            self.aws.state_bucket = Some(bucket.clone());
        }
        if let Some(dir) = &overrides.working_dir {
            self.terraform.working_dir = dir.clone();
        }
        if let Some(minutes) = overrides.lock_timeout_minutes {
            self.deploy.lock_timeout_minutes = minutes;
        }
        if let Some(auto_rollback) = overrides.auto_rollback {
            self.deploy.auto_rollback = auto_rollback;
        }
        self
    }

    /// Reject values that would break lease or retention arithmetic
    pub fn validate(&self) -> Result<(), String> {
        if self.deploy.lock_timeout_minutes == 0 {
            return Err("deploy.lock_timeout_minutes must be at least 1".to_string());
        }
        if self.deploy.backup_retention == 0 {
            return Err("deploy.backup_retention must be at least 1".to_string());
        }
        if !(1..=MAX_EVENT_TTL_DAYS).contains(&self.deploy.event_ttl_days) {
            return Err(format!(
                "deploy.event_ttl_days must be between 1 and {}",
                MAX_EVENT_TTL_DAYS
            ));
        }
        if self.aws.region.trim().is_empty() {
            return Err("aws.region must not be empty".to_string());
        }
        if matches!(&self.aws.state_bucket, Some(b) if b.trim().is_empty()) {
            return Err("aws.state_bucket must not be empty when set".to_string());
        }
        Ok(())
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_lock_table() -> String {
    DEFAULT_LOCK_TABLE.to_string()
}

fn default_state_table() -> String {
    DEFAULT_STATE_TABLE.to_string()
}

fn default_aws_bin() -> PathBuf {
    PathBuf::from("aws")
}

fn default_lock_timeout() -> u32 {
    DEFAULT_LEASE_MINUTES as u32
}

fn default_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_event_ttl() -> u32 {
    DEFAULT_EVENT_TTL_DAYS as u32
}

fn default_status_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

fn default_true() -> bool {
    true
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_terraform_bin() -> PathBuf {
    PathBuf::from("terraform")
}
