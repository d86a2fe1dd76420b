use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_schedules_table(conn)?;
    create_schedule_indexes(conn)?;
    create_contexts_table(conn)?;
    Ok(())
}

fn create_schedules_table(conn: &Connection) -> Result<()> {
    // context_id is a weak reference: no FOREIGN KEY, no cascade.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedules (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            start_ms INTEGER NOT NULL,
            end_ms INTEGER NOT NULL,
            is_locked INTEGER NOT NULL DEFAULT 0,
            context_id TEXT,
            actual_end_ms INTEGER,
            recurrence_rule TEXT,
            created_at_ms INTEGER NOT NULL,
            updated_at_ms INTEGER NOT NULL
        )",
        [],
    )
    .context("Failed to create schedules table")?;

    Ok(())
}

fn create_schedule_indexes(conn: &Connection) -> Result<()> {
    for (name, column) in [
        ("idx_schedules_start", "start_ms"),
        ("idx_schedules_end", "end_ms"),
        ("idx_schedules_context", "context_id"),
    ] {
        conn.execute(
            &format!("CREATE INDEX IF NOT EXISTS {name} ON schedules({column})"),
            [],
        )
        .with_context(|| format!("Failed to create index {}", name))?;
    }

    Ok(())
}

fn create_contexts_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contexts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            icon TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at_ms INTEGER NOT NULL
        )",
        [],
    )
    .context("Failed to create contexts table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contexts_sort ON contexts(sort_order)",
        [],
    )
    .context("Failed to create contexts sort index")?;

    Ok(())
}
