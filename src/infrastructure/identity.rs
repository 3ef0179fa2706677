//! Actor and revision discovery for lock records and state events

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::value_objects::{ActorIdentity, DeploymentContext};

const UNKNOWN: &str = "unknown";

/// `user@host` of the current process plus the checked-out commit
pub fn discover_context(working_dir: &Path) -> DeploymentContext {
    let get_env = |key: &str| std::env::var(key).ok();
    DeploymentContext::new(
        ActorIdentity::new(user_from(&get_env), host_from(&get_env, command_output)),
        git_commit(working_dir),
    )
}

fn user_from(get_env: &impl Fn(&str) -> Option<String>) -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|key| get_env(*key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn host_from(
    get_env: &impl Fn(&str) -> Option<String>,
    run: impl Fn(&str, &[&str], Option<&Path>) -> Option<String>,
) -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|key| get_env(*key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .or_else(|| run("hostname", &[], None))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn git_commit(working_dir: &Path) -> String {
    command_output("git", &["rev-parse", "HEAD"], Some(working_dir))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn command_output(program: &str, args: &[&str], dir: Option<&Path>) -> Option<String> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    let output = command.output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}
