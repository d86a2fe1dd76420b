use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;
use crate::services::live_query::ChangeFeed;

/// Thin wrapper around the planner's SQLite connection.
///
/// Also owns the change feed that store services publish to after every
/// successful write.
pub struct Database {
    conn: Connection,
    changes: ChangeFeed,
}

impl Database {
    /// Opens (or creates) a SQLite database at the provided path.
    ///
    /// # Examples
    /// ```
    /// use chronos_planner::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// db.initialize_schema().unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;

        log::info!("Opened planner database at {}", path);
        Ok(Self {
            conn,
            changes: ChangeFeed::new(),
        })
    }

    /// In-memory database with the schema already applied.
    pub fn open_in_memory() -> Result<Self> {
        let db = Self::new(":memory:")?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Provides read/write access to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Feed notified after each successful store write
    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Creates tables and indexes if they do not exist yet.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(self.connection())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish_non_exhaustive()
    }
}
