//! Tree Navigator for linkfolio.
//!
//! Pure lookups over an [`EntityStore`]: children, ancestor paths, subtrees,
//! and cycle checks. Nothing here mutates or sorts; all functions tolerate
//! corrupt data (missing parents, cycles) without looping or panicking.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::managers::entity_store::EntityStore;
use crate::types::folder::Folder;

/// Folders whose parent is `parent_id` (`None` = root), in store order.
pub fn children_of<'a>(store: &'a EntityStore, parent_id: Option<&str>) -> Vec<&'a Folder> {
    store
        .all_folders()
        .iter()
        .filter(|f| f.parent_folder_id.as_deref() == parent_id)
        .collect()
}

/// Ancestors of `folder_id`, root-first, excluding the folder itself.
///
/// The walk stops at the first parent that cannot be resolved, so corrupt
/// data yields a partial path instead of an error.
pub fn path_to<'a>(store: &'a EntityStore, folder_id: Option<&str>) -> Vec<&'a Folder> {
    let mut path = breadcrumb(store, folder_id);
    path.pop();
    path
}

/// Ancestors plus the folder itself, root-first. Empty for the root or an
/// unknown id.
pub fn breadcrumb<'a>(store: &'a EntityStore, folder_id: Option<&str>) -> Vec<&'a Folder> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = folder_id;

    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        let Some(folder) = store.folder(id) else {
            break;
        };
        path.push(folder);
        current = folder.parent_folder_id.as_deref();
    }

    path.reverse();
    path
}

fn child_index(store: &EntityStore) -> HashMap<&str, Vec<&str>> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for folder in store.all_folders() {
        if let Some(parent) = folder.parent_folder_id.as_deref() {
            index.entry(parent).or_default().push(folder.id.as_str());
        }
    }
    index
}

/// Subtree of `folder_id` in breadth-first order, starting with the folder.
fn subtree_breadth_first(store: &EntityStore, folder_id: &str) -> Vec<String> {
    let index = child_index(store);
    let mut order = vec![folder_id.to_string()];
    let mut seen: HashSet<&str> = HashSet::from([folder_id]);
    let mut queue = VecDeque::from([folder_id]);

    while let Some(id) = queue.pop_front() {
        for &child in index.get(id).map(Vec::as_slice).unwrap_or_default() {
            if seen.insert(child) {
                order.push(child.to_string());
                queue.push_back(child);
            }
        }
    }
    order
}

/// Every folder reachable from `folder_id` through child edges, including
/// `folder_id` itself.
pub fn descendant_ids(store: &EntityStore, folder_id: &str) -> HashSet<String> {
    subtree_breadth_first(store, folder_id).into_iter().collect()
}

/// Subtree ids ordered so every folder comes after all of its descendants.
/// Deleting in this order never leaves a surviving child with a deleted parent.
pub fn descendants_leaves_first(store: &EntityStore, folder_id: &str) -> Vec<String> {
    let mut order = subtree_breadth_first(store, folder_id);
    order.reverse();
    order
}

/// True iff `candidate_id` lies strictly below `folder_id`.
///
/// A folder is never its own descendant here; callers that forbid
/// self-parenting check equality separately.
pub fn is_descendant_of(store: &EntityStore, candidate_id: &str, folder_id: &str) -> bool {
    candidate_id != folder_id && descendant_ids(store, folder_id).contains(candidate_id)
}

/// True when every parent reference resolves and no folder is its own ancestor.
pub fn is_forest(store: &EntityStore) -> bool {
    let parents: HashMap<&str, Option<&str>> = store
        .all_folders()
        .iter()
        .map(|f| (f.id.as_str(), f.parent_folder_id.as_deref()))
        .collect();
    let mut verified: HashSet<&str> = HashSet::new();

    for start in parents.keys().copied() {
        let mut chain: HashSet<&str> = HashSet::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if verified.contains(id) {
                break;
            }
            if !chain.insert(id) {
                return false;
            }
            current = match parents.get(id) {
                Some(parent) => *parent,
                None => return false,
            };
        }
        verified.extend(chain);
    }
    true
}
