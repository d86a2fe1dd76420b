use chrono::{DateTime, Local};

use super::shared::{interval, map_schedule_row, select_by_id, write_schedule, WriteMode, SCHEDULE_COLUMNS};
use super::ScheduleService;
use crate::models::schedule::{Schedule, ScheduleId};
use crate::services::live_query::StoreChange;
use crate::services::store::StoreResult;
use crate::utils::date::to_millis;

impl<'a> ScheduleService<'a> {
    /// List every schedule ordered by start time.
    pub fn list_all(&self) -> StoreResult<Vec<Schedule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM schedules ORDER BY start_ms ASC, end_ms ASC",
            SCHEDULE_COLUMNS
        ))?;

        let schedules = stmt
            .query_map([], map_schedule_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(schedules)
    }

    /// Find schedules overlapping `[range_start, range_end)`.
    ///
    /// Blocks that merely touch either bound are excluded, matching the
    /// half-open overlap rule used by the layout engine.
    pub fn find_overlapping(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> StoreResult<Vec<Schedule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM schedules
             WHERE start_ms < ?1 AND end_ms > ?2
             ORDER BY start_ms ASC, end_ms ASC",
            SCHEDULE_COLUMNS
        ))?;

        let schedules = stmt
            .query_map([to_millis(range_end), to_millis(range_start)], map_schedule_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(schedules)
    }

    /// Fetch several schedules, aligned with the requested ids.
    pub fn bulk_get(&self, ids: &[ScheduleId]) -> StoreResult<Vec<Option<Schedule>>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            found.push(select_by_id(self.conn, id)?);
        }
        Ok(found)
    }

    /// Insert or overwrite several schedules in one transaction.
    pub fn bulk_put(&self, schedules: &[Schedule]) -> StoreResult<()> {
        if schedules.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut touched = Vec::with_capacity(schedules.len() * 2);
        for schedule in schedules {
            if let Some(previous) = select_by_id(&tx, &schedule.id)? {
                touched.push(interval(&previous));
            }
            write_schedule(&tx, WriteMode::Upsert, schedule)?;
            touched.push(interval(schedule));
        }
        tx.commit()?;

        self.changes.publish(&StoreChange::Schedules(touched));
        Ok(())
    }

    /// Delete several schedules in one transaction; unknown ids are skipped.
    pub fn bulk_delete(&self, ids: &[ScheduleId]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut touched = Vec::new();
        for id in ids {
            if let Some(existing) = select_by_id(&tx, id)? {
                tx.execute("DELETE FROM schedules WHERE id = ?1", [id.to_string()])?;
                touched.push(interval(&existing));
            }
        }
        tx.commit()?;

        if !touched.is_empty() {
            self.changes.publish(&StoreChange::Schedules(touched));
        }
        Ok(())
    }
}
