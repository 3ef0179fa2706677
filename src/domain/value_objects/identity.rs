//! Who is deploying, from where, and at which commit

use std::fmt;

/// Identity of the actor holding a lock or writing an event (`user@host`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorIdentity {
    user: String,
    host: String,
}

impl ActorIdentity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

/// Per-invocation facts stamped onto every state event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentContext {
    pub actor: ActorIdentity,
    pub git_commit: String,
}

impl DeploymentContext {
    pub fn new(actor: ActorIdentity, git_commit: impl Into<String>) -> Self {
        Self {
            actor,
            git_commit: git_commit.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_user_at_host() {
        let actor = ActorIdentity::new("alice", "host1");
        assert_eq!(actor.to_string(), "alice@host1");
        assert_eq!(actor.user(), "alice");
        assert_eq!(actor.host(), "host1");
    }
}
