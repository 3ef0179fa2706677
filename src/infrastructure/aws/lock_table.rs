//! DynamoDB lock table
//!
//! Item layout (hash key `lock_id`):
//! `lock_id` S, `locked_by` S, `expiry_time` N (epoch seconds),
//! `created_at` N (epoch seconds), `stack_name` S.

use serde::Deserialize;

use crate::domain::entities::DeploymentLock;
use crate::domain::ports::{LockStore, LockStoreError};

use super::cli::{args, AwsError, AwsRunner};
use super::item::{n, s, to_json, Item, ItemReader};

pub struct DynamoLockTable<R: AwsRunner> {
    runner: R,
    table: String,
}

#[derive(Deserialize)]
struct GetItemOutput {
    #[serde(rename = "Item")]
    item: Option<Item>,
}

impl<R: AwsRunner> DynamoLockTable<R> {
    pub fn new(runner: R, table: impl Into<String>) -> Self {
        Self {
            runner,
            table: table.into(),
        }
    }

    fn key(lock_id: &str) -> String {
        let mut key = Item::new();
        key.insert("lock_id".to_string(), s(lock_id));
        to_json(&key)
    }

    fn to_item(lock: &DeploymentLock) -> Item {
        let mut item = Item::new();
        item.insert("lock_id".to_string(), s(&lock.lock_id));
        item.insert("locked_by".to_string(), s(&lock.locked_by));
        item.insert("expiry_time".to_string(), n(lock.expiry_time.timestamp()));
        item.insert("created_at".to_string(), n(lock.created_at.timestamp()));
        item.insert("stack_name".to_string(), s(&lock.stack_name));
        item
    }

    fn from_item(item: &Item) -> Result<DeploymentLock, String> {
        let reader = ItemReader::new(item);
        Ok(DeploymentLock {
            lock_id: reader.string("lock_id")?,
            locked_by: reader.string("locked_by")?,
            expiry_time: reader.epoch("expiry_time")?,
            created_at: reader.epoch("created_at")?,
            stack_name: reader.string("stack_name")?,
        })
    }
}

fn backend(e: AwsError) -> LockStoreError {
    LockStoreError::Backend(e.to_string())
}

impl<R: AwsRunner> LockStore for DynamoLockTable<R> {
    fn get(&self, lock_id: &str) -> Result<Option<DeploymentLock>, LockStoreError> {
        let mut cmd = args(["dynamodb", "get-item", "--consistent-read", "--table-name"]);
        cmd.push(self.table.clone());
        cmd.push("--key".to_string());
        cmd.push(Self::key(lock_id));

        let stdout = self.runner.run(&cmd).map_err(backend)?;
        // get-item prints nothing at all for a missing key
        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let output: GetItemOutput = serde_json::from_slice(&stdout)
            .map_err(|e| LockStoreError::Malformed(e.to_string()))?;

        output
            .item
            .map(|item| Self::from_item(&item).map_err(LockStoreError::Malformed))
            .transpose()
    }

    fn put_if_absent(&self, lock: &DeploymentLock) -> Result<(), LockStoreError> {
        let mut cmd = args(["dynamodb", "put-item", "--table-name"]);
        cmd.push(self.table.clone());
        cmd.push("--item".to_string());
        cmd.push(to_json(&Self::to_item(lock)));
        cmd.push("--condition-expression".to_string());
        cmd.push("attribute_not_exists(lock_id)".to_string());

        match self.runner.run(&cmd) {
            Ok(_) => Ok(()),
            Err(e) if e.is_conditional_check_failed() => Err(LockStoreError::AlreadyExists),
            Err(e) => Err(backend(e)),
        }
    }

    fn delete(&self, lock_id: &str) -> Result<(), LockStoreError> {
        let mut cmd = args(["dynamodb", "delete-item", "--table-name"]);
        cmd.push(self.table.clone());
        cmd.push("--key".to_string());
        cmd.push(Self::key(lock_id));

        self.runner.run(&cmd).map(|_| ()).map_err(backend)
    }

    fn delete_if_unchanged(&self, observed: &DeploymentLock) -> Result<(), LockStoreError> {
        let mut values = Item::new();
        values.insert(":locked_by".to_string(), s(&observed.locked_by));
        values.insert(":expiry".to_string(), n(observed.expiry_time.timestamp()));

        let mut cmd = args(["dynamodb", "delete-item", "--table-name"]);
        cmd.push(self.table.clone());
        cmd.push("--key".to_string());
        cmd.push(Self::key(&observed.lock_id));
        cmd.push("--condition-expression".to_string());
        cmd.push("locked_by = :locked_by AND expiry_time = :expiry".to_string());
        cmd.push("--expression-attribute-values".to_string());
        cmd.push(to_json(&values));

        match self.runner.run(&cmd) {
            Ok(_) => Ok(()),
            // Someone else already replaced or removed it
            Err(e) if e.is_conditional_check_failed() => Ok(()),
            Err(e) => Err(backend(e)),
        }
    }
}
