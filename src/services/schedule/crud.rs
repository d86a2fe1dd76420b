use super::shared::{interval, select_by_id, write_schedule, WriteMode};
use super::ScheduleService;
use crate::models::schedule::{Schedule, ScheduleId, SchedulePatch};
use crate::services::live_query::StoreChange;
use crate::services::store::{StoreError, StoreResult};

impl<'a> ScheduleService<'a> {
    /// Retrieve a schedule by ID.
    pub fn get(&self, id: &ScheduleId) -> StoreResult<Option<Schedule>> {
        Ok(select_by_id(self.conn, id)?)
    }

    /// Insert a new schedule.
    ///
    /// Timestamps are persisted as epoch milliseconds; records built through
    /// [`Schedule::from_draft`] already carry that precision.
    pub fn add(&self, schedule: &Schedule) -> StoreResult<()> {
        write_schedule(self.conn, WriteMode::Insert, schedule)?;

        self.changes
            .publish(&StoreChange::Schedules(vec![interval(schedule)]));
        Ok(())
    }

    /// Merge a partial update into an existing schedule.
    pub fn update(&self, id: &ScheduleId, patch: &SchedulePatch) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let mut schedule = select_by_id(&tx, id)?.ok_or(StoreError::NotFound(*id))?;
        let before = interval(&schedule);
        schedule.apply(patch);
        write_schedule(&tx, WriteMode::Update, &schedule)?;

        tx.commit()?;

        self.changes
            .publish(&StoreChange::Schedules(vec![before, interval(&schedule)]));
        Ok(())
    }

    /// Insert or fully overwrite a schedule.
    pub fn put(&self, schedule: &Schedule) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let previous = select_by_id(&tx, &schedule.id)?;
        write_schedule(&tx, WriteMode::Upsert, schedule)?;

        tx.commit()?;

        let mut touched = vec![interval(schedule)];
        touched.extend(previous.as_ref().map(interval));
        self.changes.publish(&StoreChange::Schedules(touched));
        Ok(())
    }

    /// Delete a schedule by ID.
    pub fn delete(&self, id: &ScheduleId) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let existing = select_by_id(&tx, id)?.ok_or(StoreError::NotFound(*id))?;
        tx.execute("DELETE FROM schedules WHERE id = ?1", [id.to_string()])?;

        tx.commit()?;

        self.changes
            .publish(&StoreChange::Schedules(vec![interval(&existing)]));
        Ok(())
    }
}
