use std::fmt;

use thiserror::Error;

/// Result alias for hierarchy operations.
pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Which record collection an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Folder,
    Link,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Folder => write!(f, "folder"),
            EntityKind::Link => write!(f, "link"),
        }
    }
}

/// How far a cascade delete got before persistence failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeProgress {
    pub links_reassigned: usize,
    pub links_total: usize,
    pub folders_deleted: usize,
    pub folders_total: usize,
}

impl CascadeProgress {
    pub fn is_complete(&self) -> bool {
        self.links_reassigned == self.links_total && self.folders_deleted == self.folders_total
    }
}

impl fmt::Display for CascadeProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} links reassigned, {}/{} folders deleted",
            self.links_reassigned, self.links_total, self.folders_deleted, self.folders_total
        )
    }
}

// === PersistenceError ===

/// Errors raised by a `RecordStore` implementation.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// A stored column could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The backing store has no record with the given id.
    #[error("Stored {kind} not found: {id}")]
    RecordMissing { kind: EntityKind, id: String },
    /// The backing store could not be reached or refused the write.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
    /// The connection lock was poisoned by a panicking writer.
    #[error("Record store lock poisoned: {0}")]
    Lock(String),
}

// === HierarchyError ===

/// Errors returned by hierarchy mutations and lookups.
#[derive(Error, Debug)]
pub enum HierarchyError {
    /// Malformed input: empty name, empty url, unresolved target folder.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The referenced id does not resolve in the entity store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    /// Re-parenting would make a folder its own ancestor.
    #[error("Moving folder {folder_id} under {parent_id} would create a cycle")]
    Cycle { folder_id: String, parent_id: String },
    /// The persistence collaborator failed. `cascade` is set when a
    /// folder delete stopped partway through.
    #[error("Persistence failed: {source}")]
    Persistence {
        #[source]
        source: PersistenceError,
        cascade: Option<CascadeProgress>,
    },
}

impl HierarchyError {
    pub fn folder_not_found(id: &str) -> Self {
        HierarchyError::NotFound {
            kind: EntityKind::Folder,
            id: id.to_string(),
        }
    }

    pub fn link_not_found(id: &str) -> Self {
        HierarchyError::NotFound {
            kind: EntityKind::Link,
            id: id.to_string(),
        }
    }

    /// Progress of a partially applied cascade delete, if this error carries one.
    pub fn cascade_progress(&self) -> Option<CascadeProgress> {
        match self {
            HierarchyError::Persistence { cascade, .. } => *cascade,
            _ => None,
        }
    }
}

impl From<PersistenceError> for HierarchyError {
    fn from(source: PersistenceError) -> Self {
        HierarchyError::Persistence {
            source,
            cascade: None,
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
