//! Scripted `aws` runner for adapter tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::cli::{AwsError, AwsRunner};

#[derive(Clone, Default)]
pub struct ScriptedAws {
    replies: Arc<Mutex<VecDeque<Result<Vec<u8>, AwsError>>>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedAws {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next reply: `Ok(stdout)` or `Err(stderr)`
    pub fn reply(self, reply: Result<&str, &str>) -> Self {
        let reply = match reply {
            Ok(stdout) => Ok(stdout.as_bytes().to_vec()),
            Err(stderr) => Err(AwsError::Failed {
                code: Some(254),
                stderr: stderr.to_string(),
            }),
        };
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl AwsRunner for ScriptedAws {
    fn run(&self, args: &[String]) -> Result<Vec<u8>, AwsError> {
        self.calls.lock().unwrap().push(args.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
