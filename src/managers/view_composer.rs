//! View Composer for linkfolio.
//!
//! Derives what a folder view shows: the filtered and sorted children of a
//! folder, per-folder item counts, the global tag list, a depth-annotated
//! folder picker, and link search. Everything here is read-only.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::managers::entity_store::EntityStore;
use crate::managers::tree_navigator;
use crate::types::link::Link;
use crate::types::view::{FolderOption, Listing, SortMode, TagFilter};

/// Case-aware ordering: letters compare case-insensitively first, and on a
/// tie lowercase sorts before uppercase (`"apple" < "Apple" < "Banana"`).
pub fn compare_case_aware(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn newest_first(a: &Link, b: &Link) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Direct children (folders plus links) of `folder_id`. Grandchildren are
/// never counted.
pub fn item_count(store: &EntityStore, folder_id: Option<&str>) -> usize {
    let links = store
        .all_links()
        .iter()
        .filter(|l| l.folder_id.as_deref() == folder_id)
        .count();
    links + tree_navigator::children_of(store, folder_id).len()
}

/// `item_count` for every folder at once, keyed by folder id.
pub fn item_counts(store: &EntityStore) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = store
        .all_folders()
        .iter()
        .map(|f| (f.id.as_str(), 0))
        .collect();

    let parents = store
        .all_folders()
        .iter()
        .filter_map(|f| f.parent_folder_id.as_deref());
    let owners = store
        .all_links()
        .iter()
        .filter_map(|l| l.folder_id.as_deref());
    for id in parents.chain(owners) {
        if let Some(count) = counts.get_mut(id) {
            *count += 1;
        }
    }
    counts
}

/// The ordered child folders and links of `folder_id` (`None` = root).
///
/// The tag filter applies to links only. In `Items` mode links keep date
/// order, since a link has no item count of its own.
pub fn listing(
    store: &EntityStore,
    folder_id: Option<&str>,
    filter: &TagFilter,
    sort: SortMode,
) -> Listing {
    let mut folders: Vec<_> = tree_navigator::children_of(store, folder_id)
        .into_iter()
        .cloned()
        .collect();
    let mut links: Vec<Link> = store
        .all_links()
        .iter()
        .filter(|l| l.folder_id.as_deref() == folder_id && filter.matches(l))
        .cloned()
        .collect();

    match sort {
        SortMode::Date => {
            folders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            links.sort_by(newest_first);
        }
        SortMode::Alpha => {
            folders.sort_by(|a, b| compare_case_aware(&a.name, &b.name));
            links.sort_by(|a, b| compare_case_aware(&a.title, &b.title));
        }
        SortMode::Items => {
            let counts = item_counts(store);
            let count = |id: &str| counts.get(id).copied().unwrap_or_default();
            folders.sort_by(|a, b| count(&b.id).cmp(&count(&a.id)));
            links.sort_by(newest_first);
        }
    }

    Listing { folders, links }
}

/// Every tag used by any link in the store, ascending.
pub fn all_tags(store: &EntityStore) -> BTreeSet<String> {
    store
        .all_links()
        .iter()
        .flat_map(|l| l.tags.iter().cloned())
        .collect()
}

/// Depth-first pre-order walk of the folder forest for parent pickers.
///
/// When `exclude` is set, that folder and its whole subtree are left out,
/// so the result lists only valid new parents for it.
pub fn folder_options(store: &EntityStore, exclude: Option<&str>) -> Vec<FolderOption> {
    let mut options = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, usize)> = tree_navigator::children_of(store, None)
        .into_iter()
        .rev()
        .map(|f| (f.id.as_str(), 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        if Some(id) == exclude || !visited.insert(id) {
            continue;
        }
        let Some(folder) = store.folder(id) else {
            continue;
        };
        options.push(FolderOption {
            id: folder.id.clone(),
            name: folder.name.clone(),
            depth,
        });
        stack.extend(
            tree_navigator::children_of(store, Some(id))
                .into_iter()
                .rev()
                .map(|child| (child.id.as_str(), depth + 1)),
        );
    }
    options
}

/// Links whose title, url, or description contains `query`, ignoring case.
/// Results keep store order; a blank query matches nothing.
pub fn search_links(store: &EntityStore, query: &str) -> Vec<Link> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    store
        .all_links()
        .iter()
        .filter(|l| {
            l.title.to_lowercase().contains(&needle)
                || l.url.to_lowercase().contains(&needle)
                || l
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
