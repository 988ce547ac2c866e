//! SQLite connection setup for linkfolio.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use super::migrations;

/// How long a writer waits on a locked database file before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A configured, migrated SQLite connection.
///
/// Foreign keys are a per-connection setting in SQLite, so they are switched
/// on here for every handle before the schema is touched.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the library file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let path = path.as_ref();
        let db = Self::prepare(Connection::open(path)?)?;
        debug!(path = %path.display(), "database: opened");
        Ok(db)
    }

    /// Opens a private in-memory library, discarded on drop.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether foreign key enforcement is active on this connection.
    pub fn foreign_keys_enabled(&self) -> bool {
        self.conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0))
            .map(|on| on == 1)
            .unwrap_or(false)
    }
}
