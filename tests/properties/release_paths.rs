//! Property tests for the release path model.

use proptest::prelude::*;

use gantry::domain::{release_path, shared_link_target};

fn path_segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,12}").unwrap()
}

fn symlink_name() -> impl Strategy<Value = String> {
    proptest::collection::vec(path_segment(), 1..=4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `release_path` is pure - the same inputs always produce
    /// the same output, and the tag is always the last segment.
    #[test]
    fn property_release_path_pure_and_suffixed(
        deploy in path_segment(),
        folder in path_segment(),
        tag in path_segment(),
    ) {
        let deploy = format!("/{}", deploy);
        let a = release_path(&deploy, &folder, &tag);
        let b = release_path(&deploy, &folder, &tag);
        prop_assert_eq!(&a, &b);
        let expected_suffix = format!("/{}/{}", folder, tag);
        prop_assert!(a.ends_with(&expected_suffix));
    }

    /// PROPERTY: A shared-link target climbs exactly one level per
    /// separator in the symlink name, plus one.
    #[test]
    fn property_shared_link_target_depth(
        shared in path_segment(),
        name in symlink_name(),
        key in path_segment(),
    ) {
        let target = shared_link_target(&shared, &name, &key);
        let expected_ups = name.matches('/').count() + 1;
        prop_assert_eq!(target.matches("../").count(), expected_ups);
        let expected_suffix = format!("{}/{}", shared, key);
        prop_assert!(target.ends_with(&expected_suffix));
    }
}
