//! Optimistic mutation coordinator.
//!
//! Each single-record mutation snapshots the record, issues the write, and on
//! failure writes the snapshot back in full. Every call ends with exactly one
//! outcome message on the [`OutcomeSink`] and leaves a [`MutationStatus`]
//! behind for the caller to inspect.
//!
//! Methods take `&mut self`, so two mutations through one coordinator can
//! never interleave between snapshot and rollback.

use chrono::{DateTime, Local};

use crate::models::schedule::{Completion, Schedule, ScheduleDraft, ScheduleId, SchedulePatch};
use crate::services::notification::OutcomeSink;
use crate::services::store::{ScheduleStore, StoreError};
use crate::utils::date::{now_millis, truncate_to_millis};

mod batch;

/// Lifecycle of the most recent mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Committed,
    /// The write failed and the snapshot was restored
    RolledBack,
    /// The write failed and nothing was restored, either because there was
    /// nothing to restore or because the restore failed too
    Failed,
}

pub struct ScheduleMutator<'a, S: ScheduleStore, N: OutcomeSink> {
    store: &'a S,
    sink: &'a mut N,
    clock: fn() -> DateTime<Local>,
    status: MutationStatus,
    last_error: Option<StoreError>,
}

impl<'a, S: ScheduleStore, N: OutcomeSink> ScheduleMutator<'a, S, N> {
    pub fn new(store: &'a S, sink: &'a mut N) -> Self {
        Self {
            store,
            sink,
            clock: now_millis,
            status: MutationStatus::Idle,
            last_error: None,
        }
    }

    /// Replace the source of `created_at`/`updated_at`/completion timestamps
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn status(&self) -> MutationStatus {
        self.status
    }

    /// Error of the most recent mutation, cleared when the next one starts
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }

    /// Create a schedule from a draft. Returns the new id, or `None` on failure.
    pub fn create(&mut self, draft: ScheduleDraft) -> Option<ScheduleId> {
        let schedule = Schedule::from_draft(draft, (self.clock)());
        self.begin();

        match self.store.add(&schedule) {
            Ok(()) => {
                log::info!("Created schedule {} '{}'", schedule.id, schedule.title);
                self.commit("Time block created");
                Some(schedule.id)
            }
            Err(e) => {
                log::error!("Failed to create schedule '{}': {}", schedule.title, e);
                self.fail(e, "Failed to create time block");
                None
            }
        }
    }

    /// Apply `patch` to an existing schedule, stamping `updated_at`.
    pub fn update(&mut self, id: &ScheduleId, patch: SchedulePatch) -> bool {
        self.begin();
        let Some(snapshot) = self.snapshot(id, "Failed to update time block") else {
            return false;
        };

        let patch = patch.touched_at(truncate_to_millis((self.clock)()));
        match self.store.update(id, &patch) {
            Ok(()) => {
                log::info!("Updated schedule {}", id);
                self.commit("Time block updated");
                true
            }
            Err(e) => {
                self.roll_back(&snapshot, e, "Failed to update time block");
                false
            }
        }
    }

    pub fn delete(&mut self, id: &ScheduleId) -> bool {
        self.begin();
        let Some(snapshot) = self.snapshot(id, "Failed to delete time block") else {
            return false;
        };

        match self.store.delete(id) {
            Ok(()) => {
                log::info!("Deleted schedule {}", id);
                self.commit("Time block deleted");
                true
            }
            Err(e) => {
                self.roll_back(&snapshot, e, "Failed to delete time block");
                false
            }
        }
    }

    /// Mark the schedule done as of now
    pub fn complete(&mut self, id: &ScheduleId) -> bool {
        let now = truncate_to_millis((self.clock)());
        self.update(id, SchedulePatch::new().completion(Completion::CompletedAt(now)))
    }

    pub fn uncomplete(&mut self, id: &ScheduleId) -> bool {
        self.update(id, SchedulePatch::new().completion(Completion::Incomplete))
    }

    /// Flip the lock, given the lock state the caller currently displays
    pub fn toggle_lock(&mut self, id: &ScheduleId, currently_locked: bool) -> bool {
        self.update(id, SchedulePatch::new().locked(!currently_locked))
    }

    fn begin(&mut self) {
        self.status = MutationStatus::Pending;
        self.last_error = None;
    }

    fn commit(&mut self, message: &str) {
        self.status = MutationStatus::Committed;
        self.sink.success(message);
    }

    fn fail(&mut self, error: StoreError, message: &str) {
        self.status = MutationStatus::Failed;
        self.last_error = Some(error);
        self.sink.error(message);
    }

    /// Read the pre-mutation record, reporting and failing when it is absent
    fn snapshot(&mut self, id: &ScheduleId, failure_message: &str) -> Option<Schedule> {
        match self.store.get(id) {
            Ok(Some(schedule)) => Some(schedule),
            Ok(None) => {
                log::warn!("Schedule {} not found", id);
                self.fail(StoreError::NotFound(*id), "Schedule not found");
                None
            }
            Err(e) => {
                log::error!("Failed to read schedule {}: {}", id, e);
                self.fail(e, failure_message);
                None
            }
        }
    }

    fn roll_back(&mut self, snapshot: &Schedule, error: StoreError, message: &str) {
        log::warn!("Mutation of schedule {} failed, rolling back: {}", snapshot.id, error);

        self.status = match self.store.put(snapshot) {
            Ok(()) => MutationStatus::RolledBack,
            Err(rollback_error) => {
                log::error!(
                    "Rollback of schedule {} failed: {}",
                    snapshot.id,
                    rollback_error
                );
                MutationStatus::Failed
            }
        };
        self.last_error = Some(error);
        self.sink.error(message);
    }
}
