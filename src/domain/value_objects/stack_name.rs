//! StackName value object
//!
//! A stack name is embedded in DynamoDB keys (`deployment-{stack}`) and S3
//! keys (`{stack}.tfstate`, `backups/{stack}/...`), so it is restricted to a
//! conservative character set.

use std::fmt;

use crate::error::StackkitError;

const MAX_LEN: usize = 128;

/// Logical name of an independently deployable stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackName(String);

impl StackName {
    pub fn new(name: impl Into<String>) -> Result<Self, StackkitError> {
        let name = name.into();
        let invalid = |reason: &str| StackkitError::InvalidStackName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if name.len() > MAX_LEN {
            return Err(invalid("must be at most 128 characters"));
        }
        if name.starts_with('-') || name.starts_with('.') {
            return Err(invalid("must start with a letter, digit or '_'"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("contains disallowed character '{}'", c)));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the lock record guarding this stack
    pub fn lock_id(&self) -> String {
        format!("deployment-{}", self.0)
    }

    /// Object key of the live Terraform state
    pub fn state_key(&self) -> String {
        format!("{}.tfstate", self.0)
    }

    /// Prefix under which this stack's backups live
    pub fn backup_prefix(&self) -> String {
        format!("backups/{}/terraform.tfstate.", self.0)
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StackName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for StackName {
    type Err = StackkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_keys() {
        let stack = StackName::new("orders").unwrap();
        assert_eq!(stack.lock_id(), "deployment-orders");
        assert_eq!(stack.state_key(), "orders.tfstate");
        assert_eq!(stack.backup_prefix(), "backups/orders/terraform.tfstate.");
    }

    #[test]
    fn accepts_common_names() {
        for name in ["atlantis", "prod-ecs", "shared_vpc", "svc.v2", "9lives"] {
            assert!(StackName::new(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            StackName::new(""),
            Err(StackkitError::InvalidStackName { .. })
        ));
    }

    #[test]
    fn rejects_path_separators() {
        let err = StackName::new("../orders").unwrap_err();
        assert!(err.to_string().contains("../orders"));

        assert!(StackName::new("a/b").is_err());
        assert!(StackName::new("a b").is_err());
        assert!(StackName::new("-flag").is_err());
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "a".repeat(129);
        assert!(StackName::new(long).is_err());
        assert!(StackName::new("a".repeat(128)).is_ok());
    }
}
