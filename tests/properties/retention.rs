//! Property tests for backup pruning.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use stackkit::application::BackupCoordinator;
use stackkit::domain::value_objects::StackName;
use stackkit::infrastructure::memory::{MemoryObjectStore, SteppingClock};

const STATE: &str = r#"{"version":4,"terraform_version":"1.7.5","serial":1,"lineage":"l","resources":[]}"#;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: after prune, exactly the newest min(n, retention) backups remain.
    #[test]
    fn property_prune_keeps_newest(
        snapshots in 0usize..16,
        retention in 1usize..8,
        gaps in proptest::collection::vec(1i64..100_000, 16)
    ) {
        let clock = Arc::new(SteppingClock::fixed(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        let store = Arc::new(MemoryObjectStore::new());
        let backups = BackupCoordinator::new(store.clone(), clock.clone()).with_retention(retention);
        let stack = StackName::new("orders").unwrap();
        store.put(stack.state_key(), STATE);

        let mut taken = Vec::new();
        for gap in gaps.iter().take(snapshots) {
            clock.advance(Duration::seconds(*gap));
            taken.push(backups.snapshot(&stack).unwrap().unwrap());
        }
        // Unrelated objects under the prefix are left alone
        store.put(format!("{}notes.txt", stack.backup_prefix()), "keep me");

        let deleted = backups.prune(&stack);

        let kept = backups.list(&stack).unwrap();
        prop_assert_eq!(deleted, snapshots.saturating_sub(retention));
        prop_assert_eq!(kept.len(), snapshots.min(retention));

        taken.sort_by(|a, b| b.cmp(a));
        taken.truncate(retention);
        prop_assert_eq!(kept, taken);
        let notes_key = format!("{}notes.txt", stack.backup_prefix());
        prop_assert!(store.get(&notes_key).is_some());
    }
}
