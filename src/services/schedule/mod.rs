//! Schedule service entry point.
//! SQLite-backed implementation of [`ScheduleStore`], organized across
//! focused submodules.

use chrono::{DateTime, Local};
use rusqlite::Connection;

use crate::models::schedule::{Schedule, ScheduleId, SchedulePatch};
use crate::services::database::Database;
use crate::services::live_query::ChangeFeed;
use crate::services::store::{ScheduleStore, StoreResult};

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing schedules stored in SQLite.
pub struct ScheduleService<'a> {
    pub(crate) conn: &'a Connection,
    pub(crate) changes: &'a ChangeFeed,
}

impl<'a> ScheduleService<'a> {
    /// Create a new ScheduleService over an opened database
    pub fn new(db: &'a Database) -> Self {
        Self {
            conn: db.connection(),
            changes: db.changes(),
        }
    }
}

impl ScheduleStore for ScheduleService<'_> {
    fn get(&self, id: &ScheduleId) -> StoreResult<Option<Schedule>> {
        ScheduleService::get(self, id)
    }

    fn add(&self, schedule: &Schedule) -> StoreResult<()> {
        ScheduleService::add(self, schedule)
    }

    fn update(&self, id: &ScheduleId, patch: &SchedulePatch) -> StoreResult<()> {
        ScheduleService::update(self, id, patch)
    }

    fn put(&self, schedule: &Schedule) -> StoreResult<()> {
        ScheduleService::put(self, schedule)
    }

    fn delete(&self, id: &ScheduleId) -> StoreResult<()> {
        ScheduleService::delete(self, id)
    }

    fn bulk_get(&self, ids: &[ScheduleId]) -> StoreResult<Vec<Option<Schedule>>> {
        ScheduleService::bulk_get(self, ids)
    }

    fn bulk_put(&self, schedules: &[Schedule]) -> StoreResult<()> {
        ScheduleService::bulk_put(self, schedules)
    }

    fn bulk_delete(&self, ids: &[ScheduleId]) -> StoreResult<()> {
        ScheduleService::bulk_delete(self, ids)
    }

    fn find_overlapping(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> StoreResult<Vec<Schedule>> {
        ScheduleService::find_overlapping(self, range_start, range_end)
    }

    fn list_all(&self) -> StoreResult<Vec<Schedule>> {
        ScheduleService::list_all(self)
    }
}
