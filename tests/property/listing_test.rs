//! Property-based tests for folder listings.
//!
//! For arbitrary links, a listing must be a permutation of exactly the
//! direct children that pass the tag filter, ordered per the sort mode.

use std::cmp::Ordering;

use chrono::{TimeZone, Utc};
use linkfolio::managers::entity_store::EntityStore;
use linkfolio::managers::view_composer::{compare_case_aware, item_count, listing};
use linkfolio::types::folder::Folder;
use linkfolio::types::link::{normalize_tags, Link};
use linkfolio::types::view::{SortMode, TagFilter};
use proptest::prelude::*;

/// (title, in_folder, tags, seconds) per generated link.
type LinkSeed = (String, bool, Vec<String>, i64);

fn arb_link_seed() -> impl Strategy<Value = LinkSeed> {
    (
        "[a-zA-Z][a-zA-Z ]{0,12}",
        any::<bool>(),
        proptest::collection::vec(prop_oneof![Just("a"), Just("b"), Just("c")], 0..3)
            .prop_map(|tags| tags.into_iter().map(str::to_string).collect()),
        0i64..1_000_000,
    )
}

fn arb_sort() -> impl Strategy<Value = SortMode> {
    prop_oneof![Just(SortMode::Date), Just(SortMode::Alpha), Just(SortMode::Items)]
}

fn arb_filter() -> impl Strategy<Value = TagFilter> {
    prop_oneof![
        Just(TagFilter::All),
        Just(TagFilter::Tag("a".to_string())),
        Just(TagFilter::Tag("b".to_string())),
    ]
}

fn build_store(seeds: &[LinkSeed]) -> EntityStore {
    let folder = Folder {
        id: "box".to_string(),
        name: "Box".to_string(),
        description: None,
        parent_folder_id: None,
        created_at: Utc.timestamp_opt(0, 0).unwrap(),
    };
    let links = seeds
        .iter()
        .enumerate()
        .map(|(i, (title, in_folder, tags, secs))| Link {
            id: i.to_string(),
            url: format!("https://example.com/{}", i),
            title: title.clone(),
            tags: normalize_tags(tags),
            description: None,
            folder_id: in_folder.then(|| "box".to_string()),
            created_at: Utc.timestamp_opt(*secs, 0).unwrap(),
        })
        .collect();

    let mut store = EntityStore::new();
    store.replace(vec![folder], links);
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn listing_is_filtered_permutation_in_sort_order(
        seeds in proptest::collection::vec(arb_link_seed(), 0..30),
        sort in arb_sort(),
        filter in arb_filter(),
    ) {
        let store = build_store(&seeds);
        let view = listing(&store, Some("box"), &filter, sort);

        let mut expected: Vec<String> = store
            .all_links()
            .iter()
            .filter(|l| l.folder_id.as_deref() == Some("box") && filter.matches(l))
            .map(|l| l.id.clone())
            .collect();
        let mut actual: Vec<String> = view.links.iter().map(|l| l.id.clone()).collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);

        for pair in view.links.windows(2) {
            match sort {
                SortMode::Alpha => {
                    prop_assert_ne!(
                        compare_case_aware(&pair[0].title, &pair[1].title),
                        Ordering::Greater
                    );
                }
                SortMode::Date | SortMode::Items => {
                    prop_assert!(pair[0].created_at >= pair[1].created_at);
                }
            }
        }
    }

    #[test]
    fn item_count_matches_unfiltered_listing(seeds in proptest::collection::vec(arb_link_seed(), 0..30)) {
        let store = build_store(&seeds);
        let view = listing(&store, Some("box"), &TagFilter::All, SortMode::Date);
        prop_assert_eq!(item_count(&store, Some("box")), view.folders.len() + view.links.len());
    }
}
