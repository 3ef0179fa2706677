//! DynamoDB attribute-value JSON
//!
//! Records are converted to and from typed items and serialized by serde,
//! never assembled as strings.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One DynamoDB attribute value (only the shapes stackkit writes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
}

pub type Item = BTreeMap<String, AttributeValue>;

pub fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub fn n(value: i64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// Typed accessors over a fetched item
pub struct ItemReader<'a> {
    item: &'a Item,
}

impl<'a> ItemReader<'a> {
    pub fn new(item: &'a Item) -> Self {
        Self { item }
    }

    pub fn string(&self, name: &str) -> Result<String, String> {
        match self.item.get(name) {
            Some(AttributeValue::S(value)) => Ok(value.clone()),
            Some(AttributeValue::N(_)) => Err(format!("attribute '{}' is not a string", name)),
            None => Err(format!("missing attribute '{}'", name)),
        }
    }

    pub fn number(&self, name: &str) -> Result<i64, String> {
        match self.item.get(name) {
            Some(AttributeValue::N(value)) => value
                .parse()
                .map_err(|_| format!("attribute '{}' is not an integer: {}", name, value)),
            Some(AttributeValue::S(_)) => Err(format!("attribute '{}' is not a number", name)),
            None => Err(format!("missing attribute '{}'", name)),
        }
    }

    /// Epoch seconds stored as a number
    pub fn epoch(&self, name: &str) -> Result<DateTime<Utc>, String> {
        let secs = self.number(name)?;
        Utc.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| format!("attribute '{}' is out of range: {}", name, secs))
    }

    /// RFC 3339 timestamp stored as a string
    pub fn rfc3339(&self, name: &str) -> Result<DateTime<Utc>, String> {
        let raw = self.string(name)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| format!("attribute '{}' is not a timestamp: {}", name, e))
    }
}

pub fn to_json(value: &impl Serialize) -> String {
    // BTreeMap<String, enum of strings> always serializes
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
