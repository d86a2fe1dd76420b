//! Context service for CRUD operations on schedule contexts.
//!
//! Provides create/read/update/delete over the `contexts` table and seeds
//! the default contexts on first run. Deleting a context never touches
//! schedules; their `context_id` simply stops resolving.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::context::{default_contexts, Context, ContextId};
use crate::services::database::rows::{millis_to_local, parse_id};
use crate::services::database::Database;
use crate::services::live_query::{ChangeFeed, StoreChange};
use crate::services::store::{ContextStore, StoreError, StoreResult};
use crate::utils::date::to_millis;

const CONTEXT_COLUMNS: &str = "id, name, color, icon, sort_order, created_at_ms";

/// Service for managing contexts.
pub struct ContextService<'a> {
    conn: &'a Connection,
    changes: &'a ChangeFeed,
}

impl<'a> ContextService<'a> {
    /// Create a new ContextService over an opened database.
    pub fn new(db: &'a Database) -> Self {
        Self {
            conn: db.connection(),
            changes: db.changes(),
        }
    }

    /// Populate the default contexts when the table is empty.
    ///
    /// Returns how many contexts were seeded.
    pub fn initialize_defaults(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contexts", [], |row| row.get(0))?;

        if count > 0 {
            return Ok(0);
        }

        log::info!("Initializing default contexts");
        let defaults = default_contexts();
        let tx = self.conn.unchecked_transaction()?;
        for context in &defaults {
            insert_context(&tx, context)?;
        }
        tx.commit()?;

        self.changes.publish(&StoreChange::Contexts);
        Ok(defaults.len())
    }

    /// Create a new context.
    pub fn create(&self, context: &Context) -> StoreResult<()> {
        context
            .validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;

        insert_context(self.conn, context)?;
        self.changes.publish(&StoreChange::Contexts);
        Ok(())
    }

    /// Get a context by ID.
    pub fn get_by_id(&self, id: &ContextId) -> StoreResult<Option<Context>> {
        let context = self
            .conn
            .query_row(
                &format!("SELECT {} FROM contexts WHERE id = ?1", CONTEXT_COLUMNS),
                [id.to_string()],
                map_context_row,
            )
            .optional()?;

        Ok(context)
    }

    /// Get all contexts ordered by sort order, then name.
    pub fn list_ordered(&self) -> StoreResult<Vec<Context>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM contexts ORDER BY sort_order ASC, name ASC",
            CONTEXT_COLUMNS
        ))?;

        let contexts = stmt
            .query_map([], map_context_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contexts)
    }

    /// Update name, color, icon and sort order of an existing context.
    pub fn update(&self, context: &Context) -> StoreResult<()> {
        context
            .validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;

        let rows = self.conn.execute(
            "UPDATE contexts SET name = ?1, color = ?2, icon = ?3, sort_order = ?4 WHERE id = ?5",
            params![
                context.name.trim(),
                context.color,
                context.icon,
                context.sort_order,
                context.id.to_string(),
            ],
        )?;

        if rows == 0 {
            return Err(StoreError::ContextNotFound(context.id));
        }

        self.changes.publish(&StoreChange::Contexts);
        Ok(())
    }

    /// Delete a context by ID. Schedules referencing it are left as they are.
    pub fn delete(&self, id: &ContextId) -> StoreResult<()> {
        let rows = self
            .conn
            .execute("DELETE FROM contexts WHERE id = ?1", [id.to_string()])?;

        if rows == 0 {
            return Err(StoreError::ContextNotFound(*id));
        }

        self.changes.publish(&StoreChange::Contexts);
        Ok(())
    }
}

impl ContextStore for ContextService<'_> {
    fn list_ordered(&self) -> StoreResult<Vec<Context>> {
        ContextService::list_ordered(self)
    }

    fn get_context(&self, id: &ContextId) -> StoreResult<Option<Context>> {
        self.get_by_id(id)
    }
}

fn insert_context(conn: &Connection, context: &Context) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO contexts (id, name, color, icon, sort_order, created_at_ms)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            context.id.to_string(),
            context.name.trim(),
            context.color,
            context.icon,
            context.sort_order,
            to_millis(context.created_at),
        ],
    )
}

fn map_context_row(row: &Row<'_>) -> rusqlite::Result<Context> {
    Ok(Context {
        id: parse_id(0, row.get(0)?)?,
        name: row.get(1)?,
        color: row.get(2)?,
        icon: row.get(3)?,
        sort_order: row.get(4)?,
        created_at: millis_to_local(5, row.get(5)?)?,
    })
}
