//! S3 state bucket
//!
//! Copies are server side (`copy-object`), so state never transits the
//! deploying host except when `read` is asked for it.

use serde::Deserialize;

use crate::domain::ports::{ObjectInfo, ObjectStore, ObjectStoreError};

use super::cli::{args, AwsError, AwsRunner};

pub struct S3Bucket<R: AwsRunner> {
    runner: R,
    bucket: String,
}

#[derive(Deserialize)]
struct ListOutput {
    #[serde(rename = "Contents", default)]
    contents: Vec<ListEntry>,
}

#[derive(Deserialize)]
struct ListEntry {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Size", default)]
    size: u64,
}

impl<R: AwsRunner> S3Bucket<R> {
    pub fn new(runner: R, bucket: impl Into<String>) -> Self {
        Self {
            runner,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_call(&self, op: &str, key: &str) -> Vec<String> {
        let mut cmd = args(["s3api", op, "--bucket"]);
        cmd.push(self.bucket.clone());
        cmd.push("--key".to_string());
        cmd.push(key.to_string());
        cmd
    }
}

fn classify(key: &str, e: AwsError) -> ObjectStoreError {
    if e.is_not_found() {
        ObjectStoreError::NotFound(key.to_string())
    } else {
        ObjectStoreError::Backend(e.to_string())
    }
}

impl<R: AwsRunner> ObjectStore for S3Bucket<R> {
    fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        match self.runner.run(&self.object_call("head-object", key)) {
            Ok(_) => Ok(true),
            Err(e) => match classify(key, e) {
                ObjectStoreError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let mut cmd = args(["s3", "cp"]);
        cmd.push(format!("s3://{}/{}", self.bucket, key));
        cmd.push("-".to_string());
        cmd.push("--quiet".to_string());

        self.runner.run(&cmd).map_err(|e| classify(key, e))
    }

    fn copy(&self, from: &str, to: &str) -> Result<(), ObjectStoreError> {
        let mut cmd = self.object_call("copy-object", to);
        cmd.push("--copy-source".to_string());
        cmd.push(format!("{}/{}", self.bucket, from));

        self.runner
            .run(&cmd)
            .map(|_| ())
            .map_err(|e| classify(from, e))
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, ObjectStoreError> {
        let mut cmd = args(["s3api", "list-objects-v2", "--bucket"]);
        cmd.push(self.bucket.clone());
        cmd.push("--prefix".to_string());
        cmd.push(prefix.to_string());

        let stdout = self
            .runner
            .run(&cmd)
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;
        // An empty listing prints nothing
        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let output: ListOutput = serde_json::from_slice(&stdout)
            .map_err(|e| ObjectStoreError::Backend(format!("unreadable listing: {}", e)))?;

        Ok(output
            .contents
            .into_iter()
            .map(|entry| ObjectInfo {
                key: entry.key,
                size: entry.size,
            })
            .collect())
    }

    fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.runner
            .run(&self.object_call("delete-object", key))
            .map(|_| ())
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))
    }
}
