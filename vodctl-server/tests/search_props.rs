use std::collections::HashSet;

use proptest::prelude::*;
use vodctl_server::{MetadataStore, NewEntry};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: search returns exactly the entries whose name contains the
    /// needle, ignoring ASCII case
    #[test]
    fn prop_search_matches_substring_filter(
        names in prop::collection::vec("[a-cA-C%_]{1,6}", 0..12),
        needle in "[a-cA-C%_]{0,3}",
    ) {
        let store = MetadataStore::open_in_memory().unwrap();
        for name in &names {
            store
                .insert(&NewEntry::new(name.as_str(), "", "/video/v", "/image/i"))
                .unwrap();
        }

        let mut found: Vec<String> = store
            .search(&needle)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        let mut expected: Vec<String> = names
            .iter()
            .filter(|n| n.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()))
            .cloned()
            .collect();

        found.sort();
        expected.sort();
        prop_assert_eq!(found, expected);
    }

    /// Property: the empty needle returns the same set as get_all
    #[test]
    fn prop_empty_search_is_get_all(names in prop::collection::vec("[a-z]{1,8}", 0..12)) {
        let store = MetadataStore::open_in_memory().unwrap();
        for name in &names {
            store
                .insert(&NewEntry::new(name.as_str(), "d", "/video/v", "/image/i"))
                .unwrap();
        }

        let searched: HashSet<i64> = store.search("").unwrap().iter().map(|e| e.id).collect();
        let all: HashSet<i64> = store.get_all().unwrap().iter().map(|e| e.id).collect();
        prop_assert_eq!(searched.len(), names.len());
        prop_assert_eq!(searched, all);
    }
}
