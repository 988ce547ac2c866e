//! In-memory `RecordStore`.
//!
//! Assigns sequential numeric ids and can be told to fail specific calls,
//! which is how the engine's failure paths (including a cascade delete that
//! stops halfway) are exercised.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{ListOrder, OrderBy, RecordStore};
use crate::types::errors::{EntityKind, PersistenceError};
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::link::{Link, LinkPatch, NewLink};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    InsertFolder,
    UpdateFolder,
    DeleteFolder,
    InsertLink,
    UpdateLink,
    DeleteLink,
}

#[derive(Debug, Default)]
struct MemoryState {
    folders: Vec<Folder>,
    links: Vec<Link>,
    next_id: u64,
    writes: usize,
    fail_after: Option<usize>,
    failing: HashSet<StoreOp>,
}

impl MemoryState {
    fn check(&self, op: StoreOp) -> Result<(), PersistenceError> {
        if self.failing.contains(&op) {
            return Err(PersistenceError::Unavailable(format!("{:?} rejected", op)));
        }
        if op != StoreOp::List {
            if let Some(limit) = self.fail_after {
                if self.writes >= limit {
                    return Err(PersistenceError::Unavailable(format!(
                        "write budget of {} exhausted",
                        limit
                    )));
                }
            }
        }
        Ok(())
    }

    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

/// Record store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with pre-existing records; ids handed out later continue past
    /// the largest numeric id seeded.
    pub fn with_records(folders: Vec<Folder>, links: Vec<Link>) -> Self {
        let next_id = folders
            .iter()
            .map(|f| f.id.as_str())
            .chain(links.iter().map(|l| l.id.as_str()))
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState {
                folders,
                links,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Lets `successful_writes` more writes through, then fails every write.
    pub fn fail_after(&self, successful_writes: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_after = Some(state.writes + successful_writes);
        }
    }

    /// Fails every call of the given kind until [`heal`](Self::heal).
    pub fn fail_on(&self, op: StoreOp) {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(op);
        }
    }

    pub fn heal(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_after = None;
            state.failing.clear();
        }
    }

    /// Number of writes that have succeeded so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().map(|s| s.writes).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, PersistenceError> {
        self.state
            .lock()
            .map_err(|e| PersistenceError::Lock(e.to_string()))
    }
}

fn sort_folders(folders: &mut [Folder], order: ListOrder) {
    match order.by {
        OrderBy::CreatedAt => folders.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        OrderBy::Label => folders.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    if !order.ascending {
        folders.reverse();
    }
}

fn sort_links(links: &mut [Link], order: ListOrder) {
    match order.by {
        OrderBy::CreatedAt => links.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        OrderBy::Label => links.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    if !order.ascending {
        links.reverse();
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_folders(&self, order: ListOrder) -> Result<Vec<Folder>, PersistenceError> {
        let state = self.lock()?;
        state.check(StoreOp::List)?;
        let mut folders = state.folders.clone();
        sort_folders(&mut folders, order);
        Ok(folders)
    }

    async fn insert_folder(&self, record: NewFolder) -> Result<Folder, PersistenceError> {
        let mut state = self.lock()?;
        state.check(StoreOp::InsertFolder)?;
        let folder = record.into_folder(state.assign_id());
        state.folders.push(folder.clone());
        state.writes += 1;
        Ok(folder)
    }

    async fn update_folder(
        &self,
        id: &str,
        patch: &FolderPatch,
    ) -> Result<Folder, PersistenceError> {
        let mut state = self.lock()?;
        state.check(StoreOp::UpdateFolder)?;
        let folder = state
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| PersistenceError::RecordMissing {
                kind: EntityKind::Folder,
                id: id.to_string(),
            })?;
        patch.apply_to(folder);
        let updated = folder.clone();
        state.writes += 1;
        Ok(updated)
    }

    async fn delete_folder(&self, id: &str) -> Result<(), PersistenceError> {
        let mut state = self.lock()?;
        state.check(StoreOp::DeleteFolder)?;
        let before = state.folders.len();
        state.folders.retain(|f| f.id != id);
        if state.folders.len() == before {
            return Err(PersistenceError::RecordMissing {
                kind: EntityKind::Folder,
                id: id.to_string(),
            });
        }
        state.writes += 1;
        Ok(())
    }

    async fn list_links(&self, order: ListOrder) -> Result<Vec<Link>, PersistenceError> {
        let state = self.lock()?;
        state.check(StoreOp::List)?;
        let mut links = state.links.clone();
        sort_links(&mut links, order);
        Ok(links)
    }

    async fn insert_link(&self, record: NewLink) -> Result<Link, PersistenceError> {
        let mut state = self.lock()?;
        state.check(StoreOp::InsertLink)?;
        let link = record.into_link(state.assign_id());
        state.links.push(link.clone());
        state.writes += 1;
        Ok(link)
    }

    async fn update_link(&self, id: &str, patch: &LinkPatch) -> Result<Link, PersistenceError> {
        let mut state = self.lock()?;
        state.check(StoreOp::UpdateLink)?;
        let link = state
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| PersistenceError::RecordMissing {
                kind: EntityKind::Link,
                id: id.to_string(),
            })?;
        patch.apply_to(link);
        let updated = link.clone();
        state.writes += 1;
        Ok(updated)
    }

    async fn delete_link(&self, id: &str) -> Result<(), PersistenceError> {
        let mut state = self.lock()?;
        state.check(StoreOp::DeleteLink)?;
        let before = state.links.len();
        state.links.retain(|l| l.id != id);
        if state.links.len() == before {
            return Err(PersistenceError::RecordMissing {
                kind: EntityKind::Link,
                id: id.to_string(),
            });
        }
        state.writes += 1;
        Ok(())
    }
}
