//! SQLite-backed `RecordStore`.
//!
//! Wraps a migrated [`Database`] behind a mutex. Every call runs to
//! completion without yielding, so the lock is never held across an await.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::{ListOrder, OrderBy, RecordStore};
use crate::database::Database;
use crate::types::errors::{EntityKind, PersistenceError};
use crate::types::folder::{Folder, FolderPatch, NewFolder};
use crate::types::link::{Link, LinkPatch, NewLink};

const FOLDER_COLUMNS: &str = "id, name, description, parent_folder_id, created_at";
const LINK_COLUMNS: &str = "id, url, title, tags, description, folder_id, created_at";

/// Record store persisting folders and links in SQLite.
pub struct SqliteRecordStore {
    db: Mutex<Database>,
}

impl SqliteRecordStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens a fresh in-memory database. Handy for tests.
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, PersistenceError> {
        self.db
            .lock()
            .map_err(|e| PersistenceError::Lock(e.to_string()))
    }

    fn row_to_folder(row: &Row) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            parent_folder_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn row_to_link(row: &Row) -> rusqlite::Result<Link> {
        let tags_json: String = row.get(3)?;
        let tags = serde_json::from_str(&tags_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        Ok(Link {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            tags,
            description: row.get(4)?,
            folder_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn get_folder(db: &Database, id: &str) -> Result<Folder, PersistenceError> {
        db.connection()
            .query_row(
                &format!("SELECT {} FROM folders WHERE id = ?1", FOLDER_COLUMNS),
                params![id],
                Self::row_to_folder,
            )
            .optional()?
            .ok_or_else(|| PersistenceError::RecordMissing {
                kind: EntityKind::Folder,
                id: id.to_string(),
            })
    }

    fn get_link(db: &Database, id: &str) -> Result<Link, PersistenceError> {
        db.connection()
            .query_row(
                &format!("SELECT {} FROM links WHERE id = ?1", LINK_COLUMNS),
                params![id],
                Self::row_to_link,
            )
            .optional()?
            .ok_or_else(|| PersistenceError::RecordMissing {
                kind: EntityKind::Link,
                id: id.to_string(),
            })
    }
}

fn order_clause(order: ListOrder, label_column: &str) -> String {
    let column = match order.by {
        OrderBy::CreatedAt => "created_at",
        OrderBy::Label => label_column,
    };
    let direction = if order.ascending { "ASC" } else { "DESC" };
    format!("ORDER BY {column} {direction}, rowid {direction}")
}

fn nullable_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

/// Runs `UPDATE <table> SET ...` for the supplied columns. Returns rows affected.
fn execute_update(
    db: &Database,
    table: &str,
    id: &str,
    mut columns: Vec<(&str, Value)>,
) -> Result<usize, PersistenceError> {
    if columns.is_empty() {
        return Ok(1);
    }
    let assignments = columns
        .iter()
        .map(|(name, _)| format!("{} = ?", name))
        .collect::<Vec<_>>()
        .join(", ");
    columns.push(("id", Value::Text(id.to_string())));
    let sql = format!("UPDATE {} SET {} WHERE id = ?", table, assignments);
    let affected = db
        .connection()
        .execute(&sql, params_from_iter(columns.into_iter().map(|(_, v)| v)))?;
    Ok(affected)
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn list_folders(&self, order: ListOrder) -> Result<Vec<Folder>, PersistenceError> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare(&format!(
            "SELECT {} FROM folders {}",
            FOLDER_COLUMNS,
            order_clause(order, "name")
        ))?;
        let rows = stmt.query_map([], Self::row_to_folder)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    async fn insert_folder(&self, record: NewFolder) -> Result<Folder, PersistenceError> {
        let db = self.lock()?;
        let folder = record.into_folder(Uuid::new_v4().to_string());

        db.connection().execute(
            "INSERT INTO folders (id, name, description, parent_folder_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                folder.id,
                folder.name,
                folder.description,
                folder.parent_folder_id,
                folder.created_at
            ],
        )?;
        debug!(folder_id = %folder.id, "sqlite: folder inserted");
        Ok(folder)
    }

    async fn update_folder(
        &self,
        id: &str,
        patch: &FolderPatch,
    ) -> Result<Folder, PersistenceError> {
        let db = self.lock()?;
        let mut columns = Vec::new();
        if let Some(name) = &patch.name {
            columns.push(("name", Value::Text(name.clone())));
        }
        if let Some(description) = &patch.description {
            columns.push(("description", nullable_text(description)));
        }
        if let Some(parent) = &patch.parent_folder_id {
            columns.push(("parent_folder_id", nullable_text(parent)));
        }

        if execute_update(&db, "folders", id, columns)? == 0 {
            return Err(PersistenceError::RecordMissing {
                kind: EntityKind::Folder,
                id: id.to_string(),
            });
        }
        debug!(folder_id = %id, "sqlite: folder updated");
        Self::get_folder(&db, id)
    }

    async fn delete_folder(&self, id: &str) -> Result<(), PersistenceError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM folders WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(PersistenceError::RecordMissing {
                kind: EntityKind::Folder,
                id: id.to_string(),
            });
        }
        debug!(folder_id = %id, "sqlite: folder deleted");
        Ok(())
    }

    async fn list_links(&self, order: ListOrder) -> Result<Vec<Link>, PersistenceError> {
        let db = self.lock()?;
        let mut stmt = db.connection().prepare(&format!(
            "SELECT {} FROM links {}",
            LINK_COLUMNS,
            order_clause(order, "title")
        ))?;
        let rows = stmt.query_map([], Self::row_to_link)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    async fn insert_link(&self, record: NewLink) -> Result<Link, PersistenceError> {
        let db = self.lock()?;
        let link = record.into_link(Uuid::new_v4().to_string());
        let tags = serde_json::to_string(&link.tags)?;

        db.connection().execute(
            "INSERT INTO links (id, url, title, tags, description, folder_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                link.id,
                link.url,
                link.title,
                tags,
                link.description,
                link.folder_id,
                link.created_at
            ],
        )?;
        debug!(link_id = %link.id, "sqlite: link inserted");
        Ok(link)
    }

    async fn update_link(&self, id: &str, patch: &LinkPatch) -> Result<Link, PersistenceError> {
        let db = self.lock()?;
        let mut columns = Vec::new();
        if let Some(url) = &patch.url {
            columns.push(("url", Value::Text(url.clone())));
        }
        if let Some(title) = &patch.title {
            columns.push(("title", Value::Text(title.clone())));
        }
        if let Some(tags) = &patch.tags {
            columns.push(("tags", Value::Text(serde_json::to_string(tags)?)));
        }
        if let Some(description) = &patch.description {
            columns.push(("description", nullable_text(description)));
        }
        if let Some(folder) = &patch.folder_id {
            columns.push(("folder_id", nullable_text(folder)));
        }

        if execute_update(&db, "links", id, columns)? == 0 {
            return Err(PersistenceError::RecordMissing {
                kind: EntityKind::Link,
                id: id.to_string(),
            });
        }
        debug!(link_id = %id, "sqlite: link updated");
        Self::get_link(&db, id)
    }

    async fn delete_link(&self, id: &str) -> Result<(), PersistenceError> {
        let db = self.lock()?;
        let affected = db
            .connection()
            .execute("DELETE FROM links WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(PersistenceError::RecordMissing {
                kind: EntityKind::Link,
                id: id.to_string(),
            });
        }
        debug!(link_id = %id, "sqlite: link deleted");
        Ok(())
    }
}
