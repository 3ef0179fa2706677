//! Common test utilities for StackKit CLI and scenario tests.
//!
//! - `TestEnv`: isolated project and home directories plus a runner for
//!   the `stackkit` binary
//! - `fake_tool`: stand-in `aws` / `terraform` executables

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Variables that would leak the developer's setup into a test run
const SCRUBBED_ENV: &[&str] = &[
    "RUST_LOG",
    "AWS_REGION",
    "AWS_DEFAULT_REGION",
    "STACKKIT_REGION",
    "STACKKIT_LOCK_TABLE",
    "STACKKIT_STATE_TABLE",
    "STACKKIT_STATE_BUCKET",
    "STACKKIT_LOCK_TIMEOUT_MINUTES",
    "STACKKIT_BACKUP_RETENTION",
    "STACKKIT_EVENT_TTL_DAYS",
    "STACKKIT_AUTO_ROLLBACK",
    "STACKKIT_WORKING_DIR",
    "STACKKIT_TERRAFORM_BIN",
    "STACKKIT_AWS_BIN",
];

/// Result of running a StackKit CLI command
#[derive(Debug)]
pub struct TestResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parsed NDJSON lines of stdout
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("stdout line is JSON"))
            .collect()
    }
}

pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    env: Vec<(String, String)>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
            home_dir: tempfile::tempdir().unwrap(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.env.push((
            key.to_string(),
            value.as_ref().to_string_lossy().into_owned(),
        ));
        self
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_stackkit"));
        cmd.args(args)
            .current_dir(self.project_root.path())
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1");
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to run stackkit");
        TestResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Write an executable shell script that appends its arguments to
/// `<dir>/<name>.calls` and then runs `body`
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let log = dir.join(format!("{}.calls", name));
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\n{}\n",
        log.display(),
        body
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Arguments of every call made to a fake tool, one line per call
pub fn tool_calls(dir: &Path, name: &str) -> Vec<String> {
    fs::read_to_string(dir.join(format!("{}.calls", name)))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
