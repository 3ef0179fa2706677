//! DynamoDB state-event table
//!
//! Item layout: hash key `deployment_id` S, range key `timestamp` S
//! (RFC 3339, millisecond precision, so lexical order is time order),
//! plus `stack_name`, `state`, `user`, `host`, `git_commit` (S) and `ttl` N.
//! History queries go through the `stack_name-timestamp-index` GSI.

use chrono::SecondsFormat;
use serde::Deserialize;

use crate::domain::entities::{DeploymentState, DeploymentStateEvent};
use crate::domain::ports::{EventStore, EventStoreError};
use crate::domain::value_objects::StackName;

use super::cli::{args, AwsRunner};
use super::item::{n, s, to_json, Item, ItemReader};

/// Global secondary index keyed by stack name and timestamp
pub const STACK_INDEX: &str = "stack_name-timestamp-index";

pub struct DynamoStateTable<R: AwsRunner> {
    runner: R,
    table: String,
}

#[derive(Deserialize)]
struct QueryOutput {
    #[serde(rename = "Items", default)]
    items: Vec<Item>,
}

impl<R: AwsRunner> DynamoStateTable<R> {
    pub fn new(runner: R, table: impl Into<String>) -> Self {
        Self {
            runner,
            table: table.into(),
        }
    }

    fn to_item(event: &DeploymentStateEvent) -> Item {
        let mut item = Item::new();
        item.insert("deployment_id".to_string(), s(&event.deployment_id));
        item.insert(
            "timestamp".to_string(),
            s(event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        item.insert("stack_name".to_string(), s(&event.stack_name));
        item.insert("state".to_string(), s(event.state.as_str()));
        item.insert("user".to_string(), s(&event.user));
        item.insert("host".to_string(), s(&event.host));
        item.insert("git_commit".to_string(), s(&event.git_commit));
        item.insert("ttl".to_string(), n(event.ttl));
        item
    }

    fn from_item(item: &Item) -> Result<DeploymentStateEvent, String> {
        let reader = ItemReader::new(item);
        let state: DeploymentState = reader
            .string("state")?
            .parse()
            .map_err(|e: crate::domain::entities::UnknownState| e.to_string())?;

        Ok(DeploymentStateEvent {
            deployment_id: reader.string("deployment_id")?,
            stack_name: reader.string("stack_name")?,
            state,
            timestamp: reader.rfc3339("timestamp")?,
            user: reader.string("user")?,
            host: reader.string("host")?,
            git_commit: reader.string("git_commit")?,
            ttl: reader.number("ttl")?,
        })
    }
}

impl<R: AwsRunner> EventStore for DynamoStateTable<R> {
    fn put(&self, event: &DeploymentStateEvent) -> Result<(), EventStoreError> {
        let mut cmd = args(["dynamodb", "put-item", "--table-name"]);
        cmd.push(self.table.clone());
        cmd.push("--item".to_string());
        cmd.push(to_json(&Self::to_item(event)));

        self.runner
            .run(&cmd)
            .map(|_| ())
            .map_err(|e| EventStoreError::Backend(e.to_string()))
    }

    fn query(
        &self,
        stack: &StackName,
        limit: usize,
    ) -> Result<Vec<DeploymentStateEvent>, EventStoreError> {
        let mut values = Item::new();
        values.insert(":stack".to_string(), s(stack.as_str()));

        let mut cmd = args(["dynamodb", "query", "--table-name"]);
        cmd.push(self.table.clone());
        cmd.extend(args([
            "--index-name",
            STACK_INDEX,
            "--key-condition-expression",
            "stack_name = :stack",
            "--no-scan-index-forward",
            "--max-items",
        ]));
        cmd.push(limit.to_string());
        cmd.push("--expression-attribute-values".to_string());
        cmd.push(to_json(&values));

        let stdout = self
            .runner
            .run(&cmd)
            .map_err(|e| EventStoreError::Backend(e.to_string()))?;
        let output: QueryOutput = serde_json::from_slice(&stdout)
            .map_err(|e| EventStoreError::Malformed(e.to_string()))?;

        output
            .items
            .iter()
            .map(|item| Self::from_item(item).map_err(EventStoreError::Malformed))
            .collect()
    }
}
