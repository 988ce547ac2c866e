//! Schema migrations for the linkfolio SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at TEXT NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: folders and links")?;
    }

    Ok(())
}

fn record_version(
    conn: &Connection,
    version: i32,
    description: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) \
         VALUES (?1, ?2, ?3)",
        rusqlite::params![version, chrono::Utc::now(), description],
    )?;
    Ok(())
}

/// V1: folder tree and links.
///
/// `parent_folder_id` and `folder_id` carry no ON DELETE action; the engine
/// reassigns links and deletes subfolders leaves-first before a parent goes.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS folders (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK (length(name) > 0),
            description TEXT,
            parent_folder_id TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (parent_folder_id) REFERENCES folders(id)
        );

        CREATE TABLE IF NOT EXISTS links (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            title TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            description TEXT,
            folder_id TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (folder_id) REFERENCES folders(id)
        );

        CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_folder_id);
        CREATE INDEX IF NOT EXISTS idx_folders_created_at ON folders(created_at);
        CREATE INDEX IF NOT EXISTS idx_links_folder ON links(folder_id);
        CREATE INDEX IF NOT EXISTS idx_links_created_at ON links(created_at);
        ",
    )
}
