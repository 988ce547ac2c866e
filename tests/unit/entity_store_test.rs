//! Unit tests for the EntityStore public API.

use chrono::{DateTime, TimeZone, Utc};
use linkfolio::managers::entity_store::EntityStore;
use linkfolio::managers::view_composer;
use linkfolio::types::folder::Folder;
use linkfolio::types::link::{parse_tags, Link};
use linkfolio::types::view::{SortMode, TagFilter};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn folder(id: &str, parent: Option<&str>) -> Folder {
    Folder {
        id: id.to_string(),
        name: id.to_uppercase(),
        description: None,
        parent_folder_id: parent.map(str::to_string),
        created_at: at(1_700_000_000),
    }
}

fn link(id: &str, folder_id: Option<&str>) -> Link {
    Link {
        id: id.to_string(),
        url: format!("https://{}.example", id),
        title: id.to_string(),
        tags: parse_tags("misc"),
        description: None,
        folder_id: folder_id.map(str::to_string),
        created_at: at(1_700_000_000),
    }
}

#[test]
fn test_new_store_is_empty() {
    let store = EntityStore::new();
    assert_eq!(store.folder_count(), 0);
    assert_eq!(store.link_count(), 0);
    assert!(store.all_folders().is_empty());
    assert!(store.all_links().is_empty());
}

#[test]
fn test_replace_and_lookup() {
    let mut store = EntityStore::new();
    store.replace(
        vec![folder("a", None), folder("b", Some("a"))],
        vec![link("l1", Some("b")), link("l2", None)],
    );

    assert_eq!(store.folder_count(), 2);
    assert_eq!(store.link_count(), 2);
    assert_eq!(store.folder("b").unwrap().parent_folder_id.as_deref(), Some("a"));
    assert_eq!(store.link("l1").unwrap().folder_id.as_deref(), Some("b"));
    assert!(store.contains_folder("a"));
    assert!(!store.contains_folder("zzz"));
    assert!(store.link("zzz").is_none());
}

#[test]
fn test_replace_keeps_given_order() {
    let mut store = EntityStore::new();
    store.replace(
        vec![folder("c", None), folder("a", None), folder("b", None)],
        vec![],
    );
    let ids: Vec<&str> = store.all_folders().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_replace_discards_previous_contents() {
    let mut store = EntityStore::new();
    store.replace(vec![folder("a", None)], vec![link("l1", Some("a"))]);
    store.replace(vec![folder("x", None)], vec![]);

    assert!(!store.contains_folder("a"));
    assert!(store.contains_folder("x"));
    assert_eq!(store.link_count(), 0);
}

/// Corrupt data (a cycle and a dangling link) is accepted as loaded.
#[test]
fn test_replace_accepts_corrupt_data() {
    let mut store = EntityStore::new();
    store.replace(
        vec![folder("a", Some("b")), folder("b", Some("a"))],
        vec![link("l1", Some("ghost"))],
    );
    assert_eq!(store.folder_count(), 2);
    assert_eq!(store.link_count(), 1);
}

/// Tags stored before the lowercase rule are normalized on load, so tag
/// views and filters agree with newly created links.
#[test]
fn test_replace_normalizes_stored_tags() {
    let mut legacy = link("l1", None);
    legacy.tags = ["Work", " urgent ", ""].iter().map(|t| t.to_string()).collect();

    let mut store = EntityStore::new();
    store.replace(vec![], vec![legacy]);

    assert_eq!(store.link("l1").unwrap().tags, parse_tags("work,urgent"));

    let tags: Vec<String> = view_composer::all_tags(&store).into_iter().collect();
    assert_eq!(tags, vec!["urgent", "work"]);
    let filtered = view_composer::listing(
        &store,
        None,
        &TagFilter::parse("Work"),
        SortMode::Date,
    );
    assert_eq!(filtered.links.len(), 1);
}
