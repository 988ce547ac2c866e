//! Entity Store for linkfolio.
//!
//! Owns the session's folder and link records. Readers get slices; the only
//! public write path is [`EntityStore::replace`], used after a reload. Single
//! record edits are crate-private and driven by the mutation engine once
//! persistence has confirmed them.

use tracing::{debug, warn};

use crate::managers::tree_navigator;
use crate::types::folder::Folder;
use crate::types::link::{normalize_tags, Link};

/// In-memory collections of folders and links for one session.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    folders: Vec<Folder>,
    links: Vec<Link>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All folders in store order (creation order after a reload).
    pub fn all_folders(&self) -> &[Folder] {
        &self.folders
    }

    /// All links in store order (newest first after a reload).
    pub fn all_links(&self) -> &[Link] {
        &self.links
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn contains_folder(&self, id: &str) -> bool {
        self.folder(id).is_some()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Swaps in a freshly loaded dataset.
    ///
    /// Link tags are re-normalized, since stored rows may predate the
    /// lowercase rule. Structural corruption (cycles, dangling references)
    /// is logged and left for the lenient readers to cope with.
    pub fn replace(&mut self, folders: Vec<Folder>, mut links: Vec<Link>) {
        for link in &mut links {
            link.tags = normalize_tags(&link.tags);
        }
        self.folders = folders;
        self.links = links;

        if !tree_navigator::is_forest(self) {
            warn!("entity_store: reloaded folders do not form a forest");
        }
        let dangling = self
            .links
            .iter()
            .filter(|l| matches!(&l.folder_id, Some(fid) if !self.contains_folder(fid)))
            .count();
        if dangling > 0 {
            warn!(count = dangling, "entity_store: links reference missing folders");
        }
        debug!(
            folders = self.folders.len(),
            links = self.links.len(),
            "entity_store: replaced"
        );
    }

    pub(crate) fn insert_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    /// Overwrites the folder with the same id, keeping its position.
    pub(crate) fn put_folder(&mut self, folder: Folder) {
        if let Some(slot) = self.folders.iter_mut().find(|f| f.id == folder.id) {
            *slot = folder;
        }
    }

    pub(crate) fn remove_folder(&mut self, id: &str) -> Option<Folder> {
        let idx = self.folders.iter().position(|f| f.id == id)?;
        Some(self.folders.remove(idx))
    }

    /// New links go to the front, matching the newest-first load order.
    pub(crate) fn insert_link(&mut self, link: Link) {
        self.links.insert(0, link);
    }

    pub(crate) fn put_link(&mut self, link: Link) {
        if let Some(slot) = self.links.iter_mut().find(|l| l.id == link.id) {
            *slot = link;
        }
    }

    pub(crate) fn remove_link(&mut self, id: &str) -> Option<Link> {
        let idx = self.links.iter().position(|l| l.id == id)?;
        Some(self.links.remove(idx))
    }
}
