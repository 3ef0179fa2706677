//! `aws` CLI runner
//!
//! Every AWS call goes through the installed `aws` binary, so credentials,
//! profiles and SSO work exactly as they do for the operator's shell.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::trace;

/// Failure of one `aws` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwsError {
    /// The binary could not be started
    Spawn(String),
    /// The call ran and exited non-zero
    Failed { code: Option<i32>, stderr: String },
}

impl AwsError {
    /// A DynamoDB condition expression evaluated to false
    pub fn is_conditional_check_failed(&self) -> bool {
        self.stderr_contains(&["ConditionalCheckFailedException"])
    }

    /// The addressed object or key does not exist
    pub fn is_not_found(&self) -> bool {
        self.stderr_contains(&["NoSuchKey", "(404)", "Not Found", "does not exist"])
    }

    fn stderr_contains(&self, needles: &[&str]) -> bool {
        match self {
            AwsError::Failed { stderr, .. } => needles.iter().any(|n| stderr.contains(n)),
            AwsError::Spawn(_) => false,
        }
    }
}

impl std::fmt::Display for AwsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwsError::Spawn(msg) => write!(f, "failed to run aws: {}", msg),
            AwsError::Failed {
                code: Some(code),
                stderr,
            } => write!(f, "aws exited with {}: {}", code, stderr.trim()),
            AwsError::Failed { code: None, stderr } => {
                write!(f, "aws killed by signal: {}", stderr.trim())
            }
        }
    }
}

impl std::error::Error for AwsError {}

/// Runs `aws <args>` and returns stdout
///
/// Implementations:
/// - `AwsCli` - the real binary
/// - scripted fakes in the adapter tests
pub trait AwsRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<Vec<u8>, AwsError>;
}

impl<T: AwsRunner + ?Sized> AwsRunner for std::sync::Arc<T> {
    fn run(&self, args: &[String]) -> Result<Vec<u8>, AwsError> {
        (**self).run(args)
    }
}

#[derive(Debug, Clone)]
pub struct AwsCli {
    binary: PathBuf,
    region: String,
}

impl AwsCli {
    pub fn new(binary: impl Into<PathBuf>, region: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl AwsRunner for AwsCli {
    fn run(&self, args: &[String]) -> Result<Vec<u8>, AwsError> {
        trace!(binary = %self.binary.display(), ?args, "running aws");

        let output = Command::new(&self.binary)
            .args(args)
            .arg("--region")
            .arg(&self.region)
            .arg("--output")
            .arg("json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| AwsError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(AwsError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

/// Build an owned argument vector
pub(crate) fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
