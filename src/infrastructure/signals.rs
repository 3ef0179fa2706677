//! Lock release on SIGINT / SIGTERM
//!
//! The sink is armed when the run takes its lock and disarmed when the
//! guard releases it. A signal arriving while armed deletes the lock record
//! before the process exits with 130.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::domain::ports::{DeployEvent, DeployEventSink};

/// Exit code after an interrupt (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

type ReleaseFn = Box<dyn Fn(&str) + Send + Sync>;

pub struct InterruptReleaseSink {
    armed: Mutex<Option<String>>,
    release: ReleaseFn,
}

impl InterruptReleaseSink {
    /// `release` receives the lock id to delete
    pub fn new(release: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            armed: Mutex::new(None),
            release: Box::new(release),
        }
    }

    /// Register the process-wide signal handler
    pub fn install(self: &Arc<Self>) -> Result<(), ctrlc::Error> {
        let sink = Arc::clone(self);
        ctrlc::set_handler(move || {
            sink.fire();
            std::process::exit(INTERRUPTED_EXIT_CODE);
        })
    }

    /// Release the armed lock, if any. Returns whether a release ran.
    pub fn fire(&self) -> bool {
        let armed = match self.armed.lock() {
            Ok(mut armed) => armed.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match armed {
            Some(lock_id) => {
                warn!(lock_id = %lock_id, "interrupted, releasing deployment lock");
                (self.release)(&lock_id);
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.lock().map(|a| a.is_some()).unwrap_or(false)
    }

    fn set(&self, value: Option<String>) {
        if let Ok(mut armed) = self.armed.lock() {
            *armed = value;
        }
    }
}

impl DeployEventSink for InterruptReleaseSink {
    fn on_event(&self, event: &DeployEvent) {
        match event {
            DeployEvent::LockAcquired { lock_id, .. } => self.set(Some(lock_id.clone())),
            DeployEvent::LockReleased { .. } => self.set(None),
            _ => {}
        }
    }
}
