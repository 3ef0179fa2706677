//! ObjectStore port - the bucket holding live state and backups

use std::sync::Arc;

/// Object store operation errors
#[derive(Debug)]
pub enum ObjectStoreError {
    /// Key does not exist
    NotFound(String),
    /// Transport or service error
    Backend(String),
}

impl std::fmt::Display for ObjectStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectStoreError::NotFound(key) => write!(f, "object not found: {}", key),
            ObjectStoreError::Backend(msg) => write!(f, "object store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ObjectStoreError {}

/// Listed object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
}

/// Abstract object store
///
/// Implementations:
/// - `S3Bucket` - S3 via the `aws` CLI
/// - `MemoryObjectStore` - in-process, for tests
pub trait ObjectStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool, ObjectStoreError>;

    fn read(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Server-side copy; `NotFound` when `from` is missing
    fn copy(&self, from: &str, to: &str) -> Result<(), ObjectStoreError>;

    /// All objects whose key starts with `prefix`, in no particular order
    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, ObjectStoreError>;

    /// Delete; deleting a missing key succeeds
    fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        (**self).exists(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        (**self).read(key)
    }

    fn copy(&self, from: &str, to: &str) -> Result<(), ObjectStoreError> {
        (**self).copy(from, to)
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, ObjectStoreError> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        (**self).delete(key)
    }
}
