//! Terraform engine
//!
//! `plan` writes a saved plan into a private temp directory and counts its
//! resource changes with `terraform show -json`. `apply` runs that saved
//! plan file, so what gets applied is exactly what was reviewed.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::domain::entities::ChangeSet;
use crate::domain::ports::{EngineError, InfraEngine};

/// S3 backend settings passed to `terraform init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub bucket: String,
    pub key: String,
    pub region: String,
}

impl BackendConfig {
    fn init_args(&self) -> Vec<String> {
        vec![
            format!("-backend-config=bucket={}", self.bucket),
            format!("-backend-config=key={}", self.key),
            format!("-backend-config=region={}", self.region),
        ]
    }
}

pub struct TerraformEngine {
    binary: PathBuf,
    working_dir: PathBuf,
    backend: Option<BackendConfig>,
    plan_dir: TempDir,
    plans: AtomicUsize,
    stream_output: bool,
}

impl TerraformEngine {
    pub fn new(binary: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
            backend: None,
            plan_dir: tempfile::Builder::new().prefix("stackkit-plan-").tempdir()?,
            plans: AtomicUsize::new(0),
            stream_output: true,
        })
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Forward terraform's stdout to our stderr (off in `--json` mode)
    pub fn with_stream_output(mut self, stream: bool) -> Self {
        self.stream_output = stream;
        self
    }

    fn next_plan_file(&self) -> PathBuf {
        let n = self.plans.fetch_add(1, Ordering::SeqCst);
        self.plan_dir.path().join(format!("plan-{}.tfplan", n))
    }

    fn run(&self, args: &[String], capture_stdout: bool) -> Result<Vec<u8>, EngineError> {
        let command = format!("terraform {}", args.first().map(String::as_str).unwrap_or(""));
        debug!(command = %command, ?args, dir = %self.working_dir.display(), "running terraform");

        let stdout = if capture_stdout || !self.stream_output {
            Stdio::piped()
        } else {
            Stdio::from(io::stderr())
        };
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| EngineError::Spawn {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(EngineError::CommandFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl InfraEngine for TerraformEngine {
    fn init(&self) -> Result<(), EngineError> {
        let mut args = vec![
            "init".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
        ];
        if let Some(backend) = &self.backend {
            args.extend(backend.init_args());
        }
        self.run(&args, false)?;
        Ok(())
    }

    fn plan(&self) -> Result<ChangeSet, EngineError> {
        let plan_file = self.next_plan_file();
        self.run(
            &[
                "plan".to_string(),
                "-input=false".to_string(),
                "-no-color".to_string(),
                format!("-out={}", plan_file.display()),
            ],
            false,
        )?;

        let json = self.run(
            &[
                "show".to_string(),
                "-json".to_string(),
                plan_file.display().to_string(),
            ],
            true,
        )?;
        let count = count_resource_changes(&json)?;
        info!(plan = %plan_file.display(), resource_changes = count, "plan saved");
        Ok(ChangeSet::new(plan_file, count))
    }

    fn apply(&self, change_set: &ChangeSet) -> Result<(), EngineError> {
        self.run(&apply_args(change_set.plan_file()), false)?;
        Ok(())
    }
}

fn apply_args(plan_file: &Path) -> Vec<String> {
    vec![
        "apply".to_string(),
        "-input=false".to_string(),
        "-no-color".to_string(),
        "-auto-approve".to_string(),
        plan_file.display().to_string(),
    ]
}

#[derive(Deserialize)]
struct PlanJson {
    #[serde(default)]
    resource_changes: Vec<ResourceChange>,
}

#[derive(Deserialize)]
struct ResourceChange {
    change: Change,
}

#[derive(Deserialize)]
struct Change {
    actions: Vec<String>,
}

/// Resource changes in `terraform show -json` output, ignoring no-ops and reads
pub fn count_resource_changes(json: &[u8]) -> Result<usize, EngineError> {
    let plan: PlanJson =
        serde_json::from_slice(json).map_err(|e| EngineError::InvalidPlan(e.to_string()))?;

    Ok(plan
        .resource_changes
        .iter()
        .filter(|rc| {
            !rc.change
                .actions
                .iter()
                .all(|action| action == "no-op" || action == "read")
        })
        .count())
}
