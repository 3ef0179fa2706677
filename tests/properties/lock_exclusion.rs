//! Property tests for the lock lease against a reference model.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use stackkit::application::LockManager;
use stackkit::domain::value_objects::{ActorIdentity, StackName};
use stackkit::infrastructure::memory::{MemoryLockStore, SteppingClock};
use stackkit::StackkitError;

const LEASE_SECS: i64 = 600;

#[derive(Debug, Clone)]
enum Op {
    /// Time passes, then `actor` tries to take the lock
    Acquire { actor: u8, after_secs: i64 },
    Release,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..3, 0i64..900).prop_map(|(actor, after_secs)| Op::Acquire { actor, after_secs }),
        1 => Just(Op::Release),
    ]
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: acquire succeeds exactly when the model has no live holder,
    /// and a refused acquire always names the live holder.
    #[test]
    fn property_lock_matches_model(ops in proptest::collection::vec(op(), 1..40)) {
        let clock = Arc::new(SteppingClock::fixed(start()));
        let store = Arc::new(MemoryLockStore::new());
        let manager = LockManager::new(store.clone(), clock.clone())
            .with_lease(Duration::seconds(LEASE_SECS));
        let stack = StackName::new("orders").unwrap();

        let mut now = start();
        let mut holder: Option<(String, DateTime<Utc>)> = None;

        for op in ops {
            match op {
                Op::Acquire { actor, after_secs } => {
                    clock.advance(Duration::seconds(after_secs));
                    now += Duration::seconds(after_secs);
                    let identity = ActorIdentity::new(format!("actor{}", actor), "host");

                    let live = holder.as_ref().filter(|(_, expiry)| *expiry > now).cloned();
                    match (manager.acquire(&stack, &identity), live) {
                        (Ok(lock), None) => {
                            prop_assert_eq!(lock.expiry_time, now + Duration::seconds(LEASE_SECS));
                            holder = Some((identity.to_string(), lock.expiry_time));
                        }
                        (Err(StackkitError::LockHeld { locked_by, expiry, .. }), Some((who, until))) => {
                            prop_assert_eq!(locked_by, who);
                            prop_assert_eq!(expiry, until);
                        }
                        (result, live) => {
                            prop_assert!(false, "acquire returned {:?} with live holder {:?}", result.map(|l| l.locked_by), live);
                        }
                    }
                }
                Op::Release => {
                    manager.release(&stack);
                    holder = None;
                }
            }
            prop_assert!(store.len() <= 1);
        }
    }
}
