//! Mutation Engine for linkfolio.
//!
//! Implements `MutationEngineTrait`: validated structural changes to the
//! folder/link hierarchy. Every operation validates against the
//! [`EntityStore`] first, then writes through the [`RecordStore`], and only
//! touches the entity store once persistence has confirmed the write.
//!
//! `delete_folder` is the one multi-call operation. Each confirmed step is
//! applied to the entity store immediately, so a failure (or the future
//! being dropped) leaves the store matching exactly the calls that completed.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::managers::entity_store::EntityStore;
use crate::managers::tree_navigator;
use crate::persistence::{ListOrder, RecordStore};
use crate::types::errors::{CascadeProgress, HierarchyError, PersistenceError, Result};
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::link::{normalize_tags, Link, LinkPatch, NewLink};

/// Trait defining hierarchy mutation operations.
#[async_trait]
pub trait MutationEngineTrait {
    /// Reloads both collections from persistence and swaps them into `store`.
    async fn reload(&self, store: &mut EntityStore) -> Result<()>;
    async fn create_folder(
        &self,
        store: &mut EntityStore,
        name: &str,
        description: Option<&str>,
        parent_folder_id: Option<&str>,
    ) -> Result<Folder>;
    async fn update_folder(
        &self,
        store: &mut EntityStore,
        id: &str,
        patch: FolderPatch,
    ) -> Result<Folder>;
    /// Deletes a folder and its subtree; links inside move to root.
    async fn delete_folder(&self, store: &mut EntityStore, id: &str) -> Result<CascadeProgress>;
    async fn create_link(
        &self,
        store: &mut EntityStore,
        url: &str,
        title: &str,
        tags: BTreeSet<String>,
        description: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<Link>;
    async fn update_link(&self, store: &mut EntityStore, id: &str, patch: LinkPatch)
        -> Result<Link>;
    async fn move_link(
        &self,
        store: &mut EntityStore,
        link_id: &str,
        target_folder_id: Option<&str>,
    ) -> Result<Link>;
    async fn delete_link(&self, store: &mut EntityStore, id: &str) -> Result<()>;
}

/// Mutation engine writing through a shared record store.
pub struct MutationEngine<S: RecordStore> {
    records: Arc<S>,
}

impl<S: RecordStore> Clone for MutationEngine<S> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<S: RecordStore> MutationEngine<S> {
    pub fn new(records: Arc<S>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &Arc<S> {
        &self.records
    }
}

/// Trims a required text field, rejecting empty input.
fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        debug!(field, "mutation: rejected empty field");
        return Err(HierarchyError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims optional text; blank input becomes `None`.
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A non-null folder reference must resolve at the time the edge is created.
fn ensure_folder_target(store: &EntityStore, folder_id: Option<&str>) -> Result<()> {
    match folder_id {
        Some(fid) if !store.contains_folder(fid) => {
            debug!(folder_id = %fid, "mutation: target folder does not exist");
            Err(HierarchyError::Validation(format!(
                "folder {} does not exist",
                fid
            )))
        }
        _ => Ok(()),
    }
}

fn persistence_failed(op: &'static str, id: &str, source: PersistenceError) -> HierarchyError {
    warn!(op, id, error = %source, "mutation: persistence failed");
    HierarchyError::from(source)
}

/// Inserts have no record id yet, so the log names the containing folder.
fn insert_failed(
    op: &'static str,
    parent: Option<&str>,
    source: PersistenceError,
) -> HierarchyError {
    warn!(
        op,
        parent = parent.unwrap_or("root"),
        error = %source,
        "mutation: persistence failed"
    );
    HierarchyError::from(source)
}

#[async_trait]
impl<S: RecordStore> MutationEngineTrait for MutationEngine<S> {
    async fn reload(&self, store: &mut EntityStore) -> Result<()> {
        let folders = self
            .records
            .list_folders(ListOrder::OLDEST_FIRST)
            .await
            .map_err(|e| persistence_failed("reload", "folders", e))?;
        let links = self
            .records
            .list_links(ListOrder::NEWEST_FIRST)
            .await
            .map_err(|e| persistence_failed("reload", "links", e))?;

        debug!(folders = folders.len(), links = links.len(), "mutation: reloaded");
        store.replace(folders, links);
        Ok(())
    }

    async fn create_folder(
        &self,
        store: &mut EntityStore,
        name: &str,
        description: Option<&str>,
        parent_folder_id: Option<&str>,
    ) -> Result<Folder> {
        let name = required("folder name", name)?;
        ensure_folder_target(store, parent_folder_id)?;

        let record = NewFolder {
            name,
            description: optional(description),
            parent_folder_id: parent_folder_id.map(str::to_string),
            created_at: Utc::now(),
        };
        let folder = self
            .records
            .insert_folder(record)
            .await
            .map_err(|e| insert_failed("create_folder", parent_folder_id, e))?;

        store.insert_folder(folder.clone());
        info!(folder_id = %folder.id, name = %folder.name, "mutation: folder created");
        Ok(folder)
    }

    async fn update_folder(
        &self,
        store: &mut EntityStore,
        id: &str,
        mut patch: FolderPatch,
    ) -> Result<Folder> {
        let current = store
            .folder(id)
            .cloned()
            .ok_or_else(|| HierarchyError::folder_not_found(id))?;

        if let Some(name) = &patch.name {
            patch.name = Some(required("folder name", name)?);
        }
        if let Some(description) = &patch.description {
            patch.description = Some(optional(description.as_deref()));
        }
        if let Some(Some(parent_id)) = &patch.parent_folder_id {
            if parent_id == id || tree_navigator::is_descendant_of(store, parent_id, id) {
                debug!(folder_id = %id, parent_id = %parent_id, "mutation: rejected cyclic move");
                return Err(HierarchyError::Cycle {
                    folder_id: id.to_string(),
                    parent_id: parent_id.clone(),
                });
            }
            ensure_folder_target(store, Some(parent_id.as_str()))?;
        }

        if patch.is_empty() {
            return Ok(current);
        }

        let folder = self
            .records
            .update_folder(id, &patch)
            .await
            .map_err(|e| persistence_failed("update_folder", id, e))?;

        store.put_folder(folder.clone());
        info!(folder_id = %id, "mutation: folder updated");
        Ok(folder)
    }

    async fn delete_folder(&self, store: &mut EntityStore, id: &str) -> Result<CascadeProgress> {
        if !store.contains_folder(id) {
            return Err(HierarchyError::folder_not_found(id));
        }

        let doomed = tree_navigator::descendants_leaves_first(store, id);
        let doomed_set: HashSet<&str> = doomed.iter().map(String::as_str).collect();
        let orphaned: Vec<String> = store
            .all_links()
            .iter()
            .filter(|l| matches!(l.folder_id.as_deref(), Some(fid) if doomed_set.contains(fid)))
            .map(|l| l.id.clone())
            .collect();

        let mut progress = CascadeProgress {
            links_total: orphaned.len(),
            folders_total: doomed.len(),
            ..CascadeProgress::default()
        };
        let to_root = LinkPatch::move_to(None);

        // Links leave the subtree before any folder in it disappears
        for link_id in &orphaned {
            match self.records.update_link(link_id, &to_root).await {
                Ok(link) => {
                    store.put_link(link);
                    progress.links_reassigned += 1;
                    trace!(link_id = %link_id, "mutation: link moved to root");
                }
                Err(source) => {
                    warn!(folder_id = %id, %progress, error = %source, "mutation: cascade stopped");
                    return Err(HierarchyError::Persistence {
                        source,
                        cascade: Some(progress),
                    });
                }
            }
        }

        for folder_id in &doomed {
            match self.records.delete_folder(folder_id).await {
                Ok(()) => {
                    store.remove_folder(folder_id);
                    progress.folders_deleted += 1;
                    trace!(folder_id = %folder_id, "mutation: folder deleted");
                }
                Err(source) => {
                    warn!(folder_id = %id, %progress, error = %source, "mutation: cascade stopped");
                    return Err(HierarchyError::Persistence {
                        source,
                        cascade: Some(progress),
                    });
                }
            }
        }

        info!(folder_id = %id, %progress, "mutation: folder deleted with cascade");
        Ok(progress)
    }

    async fn create_link(
        &self,
        store: &mut EntityStore,
        url: &str,
        title: &str,
        tags: BTreeSet<String>,
        description: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<Link> {
        let url = required("url", url)?;
        let title = required("title", title)?;
        ensure_folder_target(store, folder_id)?;

        let record = NewLink {
            url,
            title,
            tags: normalize_tags(&tags),
            description: optional(description),
            folder_id: folder_id.map(str::to_string),
            created_at: Utc::now(),
        };
        let link = self
            .records
            .insert_link(record)
            .await
            .map_err(|e| insert_failed("create_link", folder_id, e))?;

        store.insert_link(link.clone());
        info!(link_id = %link.id, "mutation: link created");
        Ok(link)
    }

    async fn update_link(
        &self,
        store: &mut EntityStore,
        id: &str,
        mut patch: LinkPatch,
    ) -> Result<Link> {
        let current = store
            .link(id)
            .cloned()
            .ok_or_else(|| HierarchyError::link_not_found(id))?;

        if let Some(url) = &patch.url {
            patch.url = Some(required("url", url)?);
        }
        if let Some(title) = &patch.title {
            patch.title = Some(required("title", title)?);
        }
        if let Some(tags) = &patch.tags {
            patch.tags = Some(normalize_tags(tags));
        }
        if let Some(description) = &patch.description {
            patch.description = Some(optional(description.as_deref()));
        }
        if let Some(folder_id) = &patch.folder_id {
            ensure_folder_target(store, folder_id.as_deref())?;
        }

        if patch.is_empty() {
            return Ok(current);
        }

        let link = self
            .records
            .update_link(id, &patch)
            .await
            .map_err(|e| persistence_failed("update_link", id, e))?;

        store.put_link(link.clone());
        info!(link_id = %id, "mutation: link updated");
        Ok(link)
    }

    async fn move_link(
        &self,
        store: &mut EntityStore,
        link_id: &str,
        target_folder_id: Option<&str>,
    ) -> Result<Link> {
        let current = store
            .link(link_id)
            .cloned()
            .ok_or_else(|| HierarchyError::link_not_found(link_id))?;
        ensure_folder_target(store, target_folder_id)?;

        if current.folder_id.as_deref() == target_folder_id {
            return Ok(current);
        }

        let link = self
            .records
            .update_link(link_id, &LinkPatch::move_to(target_folder_id))
            .await
            .map_err(|e| persistence_failed("move_link", link_id, e))?;

        store.put_link(link.clone());
        info!(
            link_id = %link_id,
            folder_id = target_folder_id.unwrap_or("root"),
            "mutation: link moved"
        );
        Ok(link)
    }

    async fn delete_link(&self, store: &mut EntityStore, id: &str) -> Result<()> {
        if store.link(id).is_none() {
            return Err(HierarchyError::link_not_found(id));
        }

        self.records
            .delete_link(id)
            .await
            .map_err(|e| persistence_failed("delete_link", id, e))?;

        store.remove_link(id);
        info!(link_id = %id, "mutation: link deleted");
        Ok(())
    }
}
