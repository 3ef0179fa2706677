//! In-memory port implementations
//!
//! Used by the orchestration tests and the integration suite. Each store
//! honours the same conditional semantics as its AWS counterpart.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{DeploymentLock, DeploymentStateEvent};
use crate::domain::ports::{
    Clock, EventStore, EventStoreError, LockStore, LockStoreError, ObjectInfo, ObjectStore,
    ObjectStoreError,
};
use crate::domain::value_objects::StackName;

#[derive(Debug, Default)]
pub struct MemoryLockStore {
    records: Mutex<HashMap<String, DeploymentLock>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the create condition
    pub fn insert(&self, lock: DeploymentLock) {
        self.records
            .lock()
            .unwrap()
            .insert(lock.lock_id.clone(), lock);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LockStore for MemoryLockStore {
    fn get(&self, lock_id: &str) -> Result<Option<DeploymentLock>, LockStoreError> {
        Ok(self.records.lock().unwrap().get(lock_id).cloned())
    }

    fn put_if_absent(&self, lock: &DeploymentLock) -> Result<(), LockStoreError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&lock.lock_id) {
            return Err(LockStoreError::AlreadyExists);
        }
        records.insert(lock.lock_id.clone(), lock.clone());
        Ok(())
    }

    fn delete(&self, lock_id: &str) -> Result<(), LockStoreError> {
        self.records.lock().unwrap().remove(lock_id);
        Ok(())
    }

    fn delete_if_unchanged(&self, observed: &DeploymentLock) -> Result<(), LockStoreError> {
        let mut records = self.records.lock().unwrap();
        if records.get(&observed.lock_id) == Some(observed) {
            records.remove(&observed.lock_id);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryEventStore {
    // Insertion order breaks timestamp ties
    events: Mutex<Vec<DeploymentStateEvent>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event ever written, oldest first
    pub fn all(&self) -> Vec<DeploymentStateEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventStore for MemoryEventStore {
    fn put(&self, event: &DeploymentStateEvent) -> Result<(), EventStoreError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn query(
        &self,
        stack: &StackName,
        limit: usize,
    ) -> Result<Vec<DeploymentStateEvent>, EventStoreError> {
        let events = self.events.lock().unwrap();
        let mut matching: Vec<(usize, &DeploymentStateEvent)> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.stack_name == stack.as_str())
            .collect();
        matching.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|(_, e)| e.clone())
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.into(), content.into());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.get(key)
            .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))
    }

    fn copy(&self, from: &str, to: &str) -> Result<(), ObjectStoreError> {
        let mut objects = self.objects.lock().unwrap();
        let content = objects
            .get(from)
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound(from.to_string()))?;
        objects.insert(to.to_string(), content);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, ObjectStoreError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, content)| ObjectInfo {
                key: key.clone(),
                size: content.len() as u64,
            })
            .collect())
    }

    fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Clock that advances by a fixed step every time it is read
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// A clock that never moves
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(at, Duration::zero())
    }

    /// Jump forward without reading
    pub fn advance(&self, by: Duration) {
        let mut next = self.next.lock().unwrap();
        *next += by;
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next += self.step;
        now
    }
}
