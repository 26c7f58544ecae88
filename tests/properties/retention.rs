//! Property tests for retention selection.

use std::collections::BTreeSet;

use proptest::prelude::*;

use gantry::infrastructure::remote::select_prune_targets;

fn tag_set() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set(
        proptest::string::string_regex("[0-9]{14}").unwrap(),
        0..12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: For any keep count >= 1 and any set of existing tags,
    /// the lexicographically-greatest tag (the one "current" points at
    /// after a deploy) is never selected for deletion.
    #[test]
    fn property_retention_never_deletes_newest(
        tags in tag_set(),
        keep in 1usize..6,
    ) {
        let listing = tags.iter().cloned().collect::<Vec<_>>().join("\n");
        let deleted = select_prune_targets(&listing, keep);

        if let Some(newest) = tags.iter().next_back() {
            prop_assert!(!deleted.contains(newest));
        }
    }

    /// PROPERTY: Deletion count is exact: everything beyond the keep
    /// budget goes, nothing more, and only the oldest tags are chosen.
    #[test]
    fn property_retention_deletes_exactly_the_oldest(
        tags in tag_set(),
        keep in 1usize..6,
    ) {
        let ordered: Vec<String> = tags.iter().cloned().collect();
        let listing = ordered.join("\n");
        let deleted = select_prune_targets(&listing, keep);

        let expected = ordered.len().saturating_sub(keep);
        prop_assert_eq!(deleted.len(), expected);
        prop_assert_eq!(deleted.as_slice(), &ordered[..expected]);
    }
}
