//! Persistence contracts consumed by the timeline engine.
//!
//! The mutation coordinator and live queries only see these traits; the
//! SQLite-backed services in [`crate::services::schedule`] and
//! [`crate::services::context`] implement them.

use chrono::{DateTime, Local};

use crate::models::context::{Context, ContextId};
use crate::models::schedule::{Schedule, ScheduleId, SchedulePatch};

mod error;

pub use error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-entity operations on persisted schedules.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleStore {
    /// Fetch one schedule, `None` when absent
    fn get(&self, id: &ScheduleId) -> StoreResult<Option<Schedule>>;

    /// Insert a new record. Fails if the id already exists.
    fn add(&self, schedule: &Schedule) -> StoreResult<()>;

    /// Merge the present patch fields into an existing record.
    /// Fails with [`StoreError::NotFound`] when the id is unknown.
    fn update(&self, id: &ScheduleId, patch: &SchedulePatch) -> StoreResult<()>;

    /// Insert or fully overwrite a record
    fn put(&self, schedule: &Schedule) -> StoreResult<()>;

    /// Remove a record. Fails with [`StoreError::NotFound`] when the id is unknown.
    fn delete(&self, id: &ScheduleId) -> StoreResult<()>;

    /// Fetch several records; the result is positionally aligned with `ids`
    fn bulk_get(&self, ids: &[ScheduleId]) -> StoreResult<Vec<Option<Schedule>>>;

    fn bulk_put(&self, schedules: &[Schedule]) -> StoreResult<()>;

    /// Remove several records, ignoring ids that do not exist
    fn bulk_delete(&self, ids: &[ScheduleId]) -> StoreResult<()>;

    /// Schedules with `start < range_end && end > range_start`, ordered by start
    fn find_overlapping(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> StoreResult<Vec<Schedule>>;

    /// Every schedule ordered by start
    fn list_all(&self) -> StoreResult<Vec<Schedule>>;
}

/// Read access to contexts, as needed by the timeline.
#[cfg_attr(test, mockall::automock)]
pub trait ContextStore {
    /// All contexts ordered by their sort order
    fn list_ordered(&self) -> StoreResult<Vec<Context>>;

    fn get_context(&self, id: &ContextId) -> StoreResult<Option<Context>>;
}
