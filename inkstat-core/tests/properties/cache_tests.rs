//! Property tests for the persistent fact cache

use inkstat_core::cache::{FactCache, FactKey};
use proptest::prelude::*;

fn fact_key() -> impl Strategy<Value = FactKey> {
    prop::sample::select(FactKey::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a put is immediately readable
    #[test]
    fn read_after_write(
        host in "[a-z][a-z0-9-]{0,20}",
        key in fact_key(),
        value in "[ -~]{0,60}",
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FactCache::open(dir.path(), "facts");
        cache.put(&host, key, &value).unwrap();

        prop_assert_eq!(cache.get(&host, key), Some(value.clone()));
        cache.put(&host, key, &value).unwrap();
        prop_assert_eq!(cache.get(&host, key), Some(value));
        prop_assert_eq!(cache.len(), 1);
    }

    /// Property: facts survive a restart
    #[test]
    fn visible_after_reopen(
        entries in prop::collection::vec(("[a-z]{1,10}", fact_key(), "[ -~]{0,40}"), 1..12),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FactCache::open(dir.path(), "facts");
        for (host, key, value) in &entries {
            cache.put(host, *key, value).unwrap();
        }

        let reopened = FactCache::open(dir.path(), "facts");
        prop_assert_eq!(reopened.len(), cache.len());
        for (host, key, _) in &entries {
            prop_assert_eq!(reopened.get(host, *key), cache.get(host, *key));
        }
    }

    /// Property: hosts do not share facts
    #[test]
    fn hosts_are_isolated(key in fact_key(), value in "[a-z]{1,20}") {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FactCache::open(dir.path(), "facts");
        cache.put("alpha", key, &value).unwrap();

        prop_assert!(cache.get("beta", key).is_none());
    }
}

#[test]
fn reload_picks_up_external_writes() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = FactCache::open(dir.path(), "facts");
    let mut writer = FactCache::open(dir.path(), "facts");

    writer.put("web1", FactKey::Model, "RPi4").unwrap();
    assert!(reader.get("web1", FactKey::Model).is_none());

    reader.reload();
    assert_eq!(reader.get("web1", FactKey::Model).as_deref(), Some("RPi4"));
}
