//! Persistence collaborator for linkfolio.
//!
//! The mutation engine talks to durable storage only through [`RecordStore`].
//! Two implementations ship with the crate:
//!
//! - [`sqlite::SqliteRecordStore`]: the on-disk store, built on [`crate::database`]
//! - [`memory::InMemoryRecordStore`]: plain vectors with failure injection, for tests and demos

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::types::errors::PersistenceError;
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::link::{Link, LinkPatch, NewLink};

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Column a `list_*` call orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    CreatedAt,
    /// `name` for folders, `title` for links.
    Label,
}

/// Ordering requested from `list_*` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    pub by: OrderBy,
    pub ascending: bool,
}

impl ListOrder {
    pub const OLDEST_FIRST: ListOrder = ListOrder {
        by: OrderBy::CreatedAt,
        ascending: true,
    };
    pub const NEWEST_FIRST: ListOrder = ListOrder {
        by: OrderBy::CreatedAt,
        ascending: false,
    };
}

/// Async key-ordered record store, one collection per entity kind.
///
/// Every call is fallible; implementations must not retry internally.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_folders(&self, order: ListOrder) -> Result<Vec<Folder>, PersistenceError>;
    /// Persists a new folder and returns it with its assigned id.
    async fn insert_folder(&self, record: NewFolder) -> Result<Folder, PersistenceError>;
    async fn update_folder(&self, id: &str, patch: &FolderPatch)
        -> Result<Folder, PersistenceError>;
    async fn delete_folder(&self, id: &str) -> Result<(), PersistenceError>;

    async fn list_links(&self, order: ListOrder) -> Result<Vec<Link>, PersistenceError>;
    /// Persists a new link and returns it with its assigned id.
    async fn insert_link(&self, record: NewLink) -> Result<Link, PersistenceError>;
    async fn update_link(&self, id: &str, patch: &LinkPatch) -> Result<Link, PersistenceError>;
    async fn delete_link(&self, id: &str) -> Result<(), PersistenceError>;
}
