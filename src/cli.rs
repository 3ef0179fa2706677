//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Global flags (`--json`, `-v`) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// StackKit - safe single-flight infrastructure deployments
#[derive(Parser, Debug)]
#[command(name = "stackkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Table and bucket overrides shared by every command that touches AWS
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsArgs {
    /// AWS region
    #[arg(long)]
    pub region: Option<String>,

    /// DynamoDB table holding deployment locks
    #[arg(long)]
    pub lock_table: Option<String>,

    /// DynamoDB table holding state events
    #[arg(long)]
    pub state_table: Option<String>,

    /// S3 bucket holding live state and backups
    #[arg(long)]
    pub state_bucket: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lock, back up, plan and apply a stack, rolling back on failure
    Deploy {
        /// Stack to deploy
        stack: String,

        #[command(flatten)]
        aws: AwsArgs,

        /// Leave a failed apply in place instead of restoring the backup
        #[arg(long)]
        no_auto_rollback: bool,

        /// Terraform working directory
        #[arg(long)]
        working_dir: Option<PathBuf>,
    },

    /// Acquire or release a deployment lock by hand
    Lock {
        #[command(subcommand)]
        action: LockAction,
    },

    /// Show recent state events for a stack, newest first
    Status {
        stack: String,

        /// Number of events to show
        #[arg(long)]
        limit: Option<usize>,

        #[command(flatten)]
        aws: AwsArgs,
    },

    /// List retained state backups for a stack, newest first
    Backups {
        stack: String,

        #[command(flatten)]
        aws: AwsArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Take the lock; exits 1 if another actor holds it
    Acquire {
        stack: String,

        /// Lease length
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        timeout_minutes: u32,

        #[command(flatten)]
        aws: AwsArgs,
    },

    /// Delete the lock record (always exits 0)
    Release {
        stack: String,

        #[command(flatten)]
        aws: AwsArgs,
    },
}
