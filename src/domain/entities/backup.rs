//! StateBackup entity - a timestamped copy of a stack's Terraform state
//!
//! Keys look like `backups/{stack}/terraform.tfstate.{YYYYMMDD-HHMMSS}`;
//! ordering comes from the embedded timestamp, never from object metadata.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::value_objects::StackName;

/// Timestamp suffix format of backup keys
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBackup {
    key: String,
    taken_at: DateTime<Utc>,
}

impl StateBackup {
    /// Backup that would be written for `stack` at `now`
    pub fn for_stack(stack: &StackName, now: DateTime<Utc>) -> Self {
        Self {
            key: format!(
                "{}{}",
                stack.backup_prefix(),
                now.format(BACKUP_TIMESTAMP_FORMAT)
            ),
            // Truncate to the key's resolution so parse(for_stack(t)) == for_stack(t)
            taken_at: now
                .format(BACKUP_TIMESTAMP_FORMAT)
                .to_string()
                .parse_backup_time()
                .unwrap_or(now),
        }
    }

    /// Recognize a listed object key as one of `stack`'s backups
    pub fn parse(stack: &StackName, key: &str) -> Option<Self> {
        let suffix = key.strip_prefix(&stack.backup_prefix())?;
        let taken_at = suffix.parse_backup_time()?;
        Some(Self {
            key: key.to_string(),
            taken_at,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

impl PartialOrd for StateBackup {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StateBackup {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.taken_at
            .cmp(&other.taken_at)
            .then_with(|| self.key.cmp(&other.key))
    }
}

trait ParseBackupTime {
    fn parse_backup_time(&self) -> Option<DateTime<Utc>>;
}

impl<T: AsRef<str>> ParseBackupTime for T {
    fn parse_backup_time(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(self.as_ref(), BACKUP_TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}
