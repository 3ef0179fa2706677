//! Two operators (or CI jobs) deploying the same stack at the same moment.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, TimeZone, Utc};

use stackkit::application::LockManager;
use stackkit::domain::entities::DeploymentLock;
use stackkit::domain::ports::SystemClock;
use stackkit::domain::value_objects::{ActorIdentity, StackName};
use stackkit::infrastructure::memory::MemoryLockStore;
use stackkit::StackkitError;

const RACERS: usize = 8;

fn race(store: Arc<MemoryLockStore>) -> Vec<Result<String, StackkitError>> {
    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let manager = LockManager::new(store, SystemClock);
                let stack = StackName::new("orders").unwrap();
                let actor = ActorIdentity::new(format!("ci{}", i), "runner");
                barrier.wait();
                manager.acquire(&stack, &actor).map(|lock| lock.locked_by)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn exactly_one_concurrent_acquirer_wins() {
    let store = Arc::new(MemoryLockStore::new());

    let results = race(store.clone());

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "results: {:?}", results);
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, StackkitError::LockHeld { .. }), "{err}");
        }
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn exactly_one_acquirer_takes_over_an_expired_lock() {
    let store = Arc::new(MemoryLockStore::new());
    let stack = StackName::new("orders").unwrap();
    let crashed = ActorIdentity::new("crashed", "old-runner");
    // A run that died two hours ago without releasing
    store.insert(DeploymentLock::new(
        &stack,
        &crashed,
        Utc::now() - Duration::hours(2),
        Duration::minutes(30),
    ));

    let results = race(store.clone());

    let winners: Vec<&String> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "results: {:?}", results);
    let losers_named_winner = results
        .iter()
        .filter_map(|r| match r {
            Err(StackkitError::LockHeld { locked_by, .. }) => Some(locked_by),
            _ => None,
        })
        .all(|holder| holder == winners[0]);
    assert!(losers_named_winner);
}

#[test]
fn lock_is_free_after_the_winner_releases() {
    let store = Arc::new(MemoryLockStore::new());
    let stack = StackName::new("orders").unwrap();
    let clock_start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(stackkit::infrastructure::memory::SteppingClock::fixed(clock_start));
    let manager = LockManager::new(store.clone(), clock);

    let alice = ActorIdentity::new("alice", "laptop");
    let bob = ActorIdentity::new("bob", "ci");

    let guard = manager.acquire_guard(&stack, &alice).unwrap();
    assert!(matches!(
        manager.acquire(&stack, &bob),
        Err(StackkitError::LockHeld { .. })
    ));
    drop(guard);

    assert_eq!(manager.acquire(&stack, &bob).unwrap().locked_by, "bob@ci");
}
