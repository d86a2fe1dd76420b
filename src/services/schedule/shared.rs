use chrono::{DateTime, Local};
use rusqlite::{self, params, Connection, OptionalExtension, Row};

use crate::models::schedule::{Completion, Schedule, ScheduleId};
use crate::services::database::rows::{millis_to_local, parse_id};
use crate::utils::date::to_millis;

pub(crate) const SCHEDULE_COLUMNS: &str = "id, title, start_ms, end_ms, is_locked, context_id, \
     actual_end_ms, recurrence_rule, created_at_ms, updated_at_ms";

pub(crate) fn map_schedule_row(row: &Row<'_>) -> rusqlite::Result<Schedule> {
    let actual_end = row
        .get::<_, Option<i64>>(6)?
        .map(|ms| millis_to_local(6, ms))
        .transpose()?;

    Ok(Schedule {
        id: parse_id(0, row.get(0)?)?,
        title: row.get(1)?,
        start: millis_to_local(2, row.get(2)?)?,
        end: millis_to_local(3, row.get(3)?)?,
        is_locked: row.get::<_, i32>(4)? != 0,
        context_id: row
            .get::<_, Option<String>>(5)?
            .map(|value| parse_id(5, value))
            .transpose()?,
        completion: Completion::from_option(actual_end),
        recurrence_rule: row.get(7)?,
        created_at: millis_to_local(8, row.get(8)?)?,
        updated_at: millis_to_local(9, row.get(9)?)?,
    })
}

/// The interval a schedule occupied, for change notifications
pub(crate) fn interval(schedule: &Schedule) -> (DateTime<Local>, DateTime<Local>) {
    (schedule.start, schedule.end)
}

const INSERT_SQL: &str = "INSERT INTO schedules (
        id, title, start_ms, end_ms, is_locked, context_id,
        actual_end_ms, recurrence_rule, created_at_ms, updated_at_ms
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const UPSERT_SQL: &str = "INSERT OR REPLACE INTO schedules (
        id, title, start_ms, end_ms, is_locked, context_id,
        actual_end_ms, recurrence_rule, created_at_ms, updated_at_ms
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const UPDATE_SQL: &str = "UPDATE schedules SET
        title = ?2, start_ms = ?3, end_ms = ?4, is_locked = ?5, context_id = ?6,
        actual_end_ms = ?7, recurrence_rule = ?8, created_at_ms = ?9, updated_at_ms = ?10
     WHERE id = ?1";

#[derive(Debug, Clone, Copy)]
pub(crate) enum WriteMode {
    Insert,
    Upsert,
    Update,
}

/// Write every column of `schedule`; returns the affected row count
pub(crate) fn write_schedule(
    conn: &Connection,
    mode: WriteMode,
    schedule: &Schedule,
) -> rusqlite::Result<usize> {
    let sql = match mode {
        WriteMode::Insert => INSERT_SQL,
        WriteMode::Upsert => UPSERT_SQL,
        WriteMode::Update => UPDATE_SQL,
    };

    conn.execute(
        sql,
        params![
            schedule.id.to_string(),
            schedule.title,
            to_millis(schedule.start),
            to_millis(schedule.end),
            schedule.is_locked as i32,
            schedule.context_id.map(|id| id.to_string()),
            schedule.completion.completed_at().map(to_millis),
            schedule.recurrence_rule,
            to_millis(schedule.created_at),
            to_millis(schedule.updated_at),
        ],
    )
}

pub(crate) fn select_by_id(conn: &Connection, id: &ScheduleId) -> rusqlite::Result<Option<Schedule>> {
    conn.query_row(
        &format!("SELECT {} FROM schedules WHERE id = ?1", SCHEDULE_COLUMNS),
        [id.to_string()],
        map_schedule_row,
    )
    .optional()
}
