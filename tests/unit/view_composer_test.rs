//! Unit tests for derived folder views: listings, counts, tags, pickers, search.

use chrono::{DateTime, TimeZone, Utc};
use linkfolio::managers::entity_store::EntityStore;
use linkfolio::managers::view_composer::*;
use linkfolio::types::folder::Folder;
use linkfolio::types::link::{parse_tags, Link};
use linkfolio::types::view::{SortMode, TagFilter};
use rstest::rstest;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn folder(id: &str, name: &str, parent: Option<&str>, secs: i64) -> Folder {
    Folder {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        parent_folder_id: parent.map(str::to_string),
        created_at: at(secs),
    }
}

fn link(id: &str, title: &str, folder_id: Option<&str>, tags: &str, secs: i64) -> Link {
    Link {
        id: id.to_string(),
        url: format!("https://example.com/{}", id),
        title: title.to_string(),
        tags: parse_tags(tags),
        description: None,
        folder_id: folder_id.map(str::to_string),
        created_at: at(secs),
    }
}

fn store_of(folders: Vec<Folder>, links: Vec<Link>) -> EntityStore {
    let mut store = EntityStore::new();
    store.replace(folders, links);
    store
}

fn folder_names(folders: &[Folder]) -> Vec<&str> {
    folders.iter().map(|f| f.name.as_str()).collect()
}

fn link_ids(links: &[Link]) -> Vec<&str> {
    links.iter().map(|l| l.id.as_str()).collect()
}

// === Sorting ===

#[rstest]
#[case("apple", "Banana", std::cmp::Ordering::Less)]
#[case("Banana", "Cherry", std::cmp::Ordering::Less)]
#[case("apple", "Apple", std::cmp::Ordering::Less)]
#[case("Apple", "apple", std::cmp::Ordering::Greater)]
#[case("same", "same", std::cmp::Ordering::Equal)]
fn test_compare_case_aware(
    #[case] a: &str,
    #[case] b: &str,
    #[case] expected: std::cmp::Ordering,
) {
    assert_eq!(compare_case_aware(a, b), expected);
}

#[test]
fn test_alpha_sort_ignores_case() {
    let store = store_of(
        vec![
            folder("1", "Cherry", None, 1),
            folder("2", "apple", None, 2),
            folder("3", "Banana", None, 3),
        ],
        vec![
            link("11", "zeta", None, "", 1),
            link("12", "Alpha", None, "", 2),
        ],
    );
    let listing = listing(&store, None, &TagFilter::All, SortMode::Alpha);
    assert_eq!(folder_names(&listing.folders), vec!["apple", "Banana", "Cherry"]);
    assert_eq!(link_ids(&listing.links), vec!["12", "11"]);
}

#[test]
fn test_date_sort_newest_first() {
    let store = store_of(
        vec![folder("1", "Old", None, 10), folder("2", "New", None, 30)],
        vec![
            link("11", "first", None, "", 10),
            link("12", "third", None, "", 30),
            link("13", "second", None, "", 20),
        ],
    );
    let listing = listing(&store, None, &TagFilter::All, SortMode::Date);
    assert_eq!(folder_names(&listing.folders), vec!["New", "Old"]);
    assert_eq!(link_ids(&listing.links), vec!["12", "13", "11"]);
}

#[test]
fn test_items_sort_by_direct_item_count() {
    let store = store_of(
        vec![
            folder("1", "Empty", None, 1),
            folder("2", "Busy", None, 2),
            folder("3", "Some", None, 3),
            folder("4", "Nested", Some("2"), 4),
        ],
        vec![
            link("11", "a", Some("2"), "", 1),
            link("12", "b", Some("2"), "", 2),
            link("13", "c", Some("3"), "", 3),
            link("14", "root old", None, "", 4),
            link("15", "root new", None, "", 5),
        ],
    );
    let listing = listing(&store, None, &TagFilter::All, SortMode::Items);
    assert_eq!(folder_names(&listing.folders), vec!["Busy", "Some", "Empty"]);
    assert_eq!(link_ids(&listing.links), vec!["15", "14"]);
}

// === Filtering ===

#[test]
fn test_tag_filter_applies_to_links_only() {
    let store = store_of(
        vec![folder("1", "Folder", None, 1)],
        vec![
            link("11", "one", None, "work", 3),
            link("12", "two", None, "home", 2),
            link("13", "three", None, "work, home", 1),
        ],
    );
    let listing = listing(&store, None, &TagFilter::from("work"), SortMode::Date);
    assert_eq!(link_ids(&listing.links), vec!["11", "13"]);
    assert_eq!(listing.folders.len(), 1);

    let everything = listing_all(&store);
    assert_eq!(everything.links.len(), 3);
}

fn listing_all(store: &EntityStore) -> linkfolio::types::view::Listing {
    listing(store, None, &TagFilter::parse("all"), SortMode::Date)
}

#[test]
fn test_listing_only_shows_direct_children() {
    let store = store_of(
        vec![folder("1", "A", None, 1), folder("2", "B", Some("1"), 2)],
        vec![
            link("11", "in a", Some("1"), "", 1),
            link("12", "in b", Some("2"), "", 2),
        ],
    );
    let inside_a = listing(&store, Some("1"), &TagFilter::All, SortMode::Date);
    assert_eq!(folder_names(&inside_a.folders), vec!["B"]);
    assert_eq!(link_ids(&inside_a.links), vec!["11"]);

    let root = listing_all(&store);
    assert_eq!(folder_names(&root.folders), vec!["A"]);
    assert!(root.links.is_empty());
}

#[test]
fn test_listing_of_empty_or_unknown_folder_is_empty() {
    let store = store_of(vec![folder("1", "A", None, 1)], vec![]);
    assert!(listing(&store, Some("1"), &TagFilter::All, SortMode::Date).is_empty());
    assert!(listing(&store, Some("zzz"), &TagFilter::All, SortMode::Alpha).is_empty());
}

// === Counts and tags ===

#[test]
fn test_item_count_counts_direct_children_only() {
    let store = store_of(
        vec![
            folder("1", "A", None, 1),
            folder("2", "B", Some("1"), 2),
            folder("3", "C", Some("2"), 3),
        ],
        vec![
            link("11", "x", Some("1"), "", 1),
            link("12", "y", Some("2"), "", 2),
            link("13", "z", Some("3"), "", 3),
        ],
    );
    assert_eq!(item_count(&store, Some("1")), 2);
    assert_eq!(item_count(&store, Some("3")), 1);
    assert_eq!(item_count(&store, None), 1);

    let counts = item_counts(&store);
    assert_eq!(counts.get("1"), Some(&2));
    assert_eq!(counts.get("2"), Some(&2));
    assert_eq!(counts.get("3"), Some(&1));
}

#[test]
fn test_all_tags_sorted_and_deduplicated() {
    let store = store_of(
        vec![],
        vec![
            link("11", "a", None, "rust, web", 1),
            link("12", "b", None, "Web, db", 2),
            link("13", "c", None, "", 3),
        ],
    );
    let tags: Vec<String> = all_tags(&store).into_iter().collect();
    assert_eq!(tags, vec!["db", "rust", "web"]);
}

// === Folder picker ===

fn picker_store() -> EntityStore {
    store_of(
        vec![
            folder("1", "Work", None, 1),
            folder("2", "Rust", Some("1"), 2),
            folder("3", "Async", Some("2"), 3),
            folder("4", "Home", None, 4),
            folder("5", "Infra", Some("1"), 5),
        ],
        vec![],
    )
}

#[test]
fn test_folder_options_depth_first_with_depth() {
    let options = folder_options(&picker_store(), None);
    let labels: Vec<String> = options.iter().map(|o| o.indented_label()).collect();
    assert_eq!(
        labels,
        vec!["Work", "  Rust", "    Async", "  Infra", "Home"]
    );
    assert_eq!(options[2].depth, 2);
}

#[test]
fn test_folder_options_exclude_subtree() {
    let options = folder_options(&picker_store(), Some("2"));
    let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "5", "4"]);
}

#[test]
fn test_folder_options_survive_cycles() {
    let store = store_of(
        vec![
            folder("1", "Root", None, 1),
            folder("2", "Loop A", Some("3"), 2),
            folder("3", "Loop B", Some("2"), 3),
        ],
        vec![],
    );
    let options = folder_options(&store, None);
    assert_eq!(options.len(), 1);
}

// === Search ===

#[rstest]
#[case("rust", vec!["11", "13"])]
#[case("RUST", vec!["11", "13"])]
#[case("example.com/12", vec!["12"])]
#[case("tutorial", vec!["13"])]
#[case("   ", vec![])]
#[case("nothing-matches", vec![])]
fn test_search_links(#[case] query: &str, #[case] expected: Vec<&str>) {
    let mut tutorial = link("13", "Learning", None, "", 3);
    tutorial.description = Some("A Rust tutorial".to_string());
    let store = store_of(
        vec![],
        vec![
            link("11", "The Rust Book", None, "", 1),
            link("12", "News", None, "", 2),
            tutorial,
        ],
    );
    let found = search_links(&store, query);
    assert_eq!(link_ids(&found), expected);
}
