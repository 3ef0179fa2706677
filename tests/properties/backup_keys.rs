//! Property tests for backup key formatting/parsing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use stackkit::domain::entities::StateBackup;
use stackkit::domain::value_objects::StackName;

fn stack_name() -> impl Strategy<Value = StackName> {
    proptest::string::string_regex("[a-z0-9_][a-z0-9._-]{0,30}")
        .unwrap()
        .prop_map(|s| StackName::new(s).unwrap())
}

/// Whole seconds between 2000-01-01 and 2099-12-31
fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..4_102_444_799i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a listed key parses back to the backup that produced it.
    #[test]
    fn property_backup_key_parses_back(stack in stack_name(), at in timestamp()) {
        let backup = StateBackup::for_stack(&stack, at);

        let expected_prefix = format!("backups/{}/terraform.tfstate.", stack);
        prop_assert!(backup.key().starts_with(&expected_prefix));
        prop_assert_eq!(StateBackup::parse(&stack, backup.key()), Some(backup.clone()));
        prop_assert_eq!(backup.taken_at(), at);
    }

    /// PROPERTY: key order and time order agree, so listing order is
    /// chronological without reading object metadata.
    #[test]
    fn property_key_order_is_time_order(
        stack in stack_name(),
        times in proptest::collection::vec(timestamp(), 2..12)
    ) {
        let backups: Vec<StateBackup> =
            times.iter().map(|t| StateBackup::for_stack(&stack, *t)).collect();

        let mut by_key = backups.clone();
        by_key.sort_by(|a, b| a.key().cmp(b.key()));
        let mut by_time = backups;
        by_time.sort();

        prop_assert_eq!(by_key, by_time);
    }

    /// PROPERTY: another stack's backups are never recognized.
    #[test]
    fn property_foreign_keys_rejected(
        stack in stack_name(),
        other in stack_name(),
        at in timestamp()
    ) {
        prop_assume!(stack != other);
        let foreign = StateBackup::for_stack(&other, at);
        prop_assert_eq!(StateBackup::parse(&stack, foreign.key()), None);
    }
}
