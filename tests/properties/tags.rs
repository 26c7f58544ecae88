//! Property tests for release tag generation.

use proptest::prelude::*;

use gantry::TagGenerator;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every sequence of generated tags is strictly increasing
    /// under plain lexicographic comparison, no matter how fast the
    /// calls come.
    #[test]
    fn property_tags_strictly_increase(count in 2usize..40) {
        let generator = TagGenerator::new();
        let tags: Vec<String> = (0..count).map(|_| generator.next()).collect();

        for pair in tags.windows(2) {
            prop_assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    /// PROPERTY: Generated tags are all digits, so lexicographic order
    /// and numeric order agree and remote `ls` sorting is stable.
    #[test]
    fn property_tags_are_numeric(count in 1usize..20) {
        let generator = TagGenerator::new();
        for _ in 0..count {
            let tag = generator.next();
            prop_assert!(tag.chars().all(|c| c.is_ascii_digit()));
            prop_assert!(tag.len() >= 17);
        }
    }
}
