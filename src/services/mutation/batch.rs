use chrono::Duration;

use super::{MutationStatus, ScheduleMutator};
use crate::models::schedule::{Schedule, ScheduleId};
use crate::services::notification::OutcomeSink;
use crate::services::store::ScheduleStore;
use crate::utils::date::truncate_to_millis;

impl<'a, S: ScheduleStore, N: OutcomeSink> ScheduleMutator<'a, S, N> {
    /// Delete several schedules in one store call.
    ///
    /// There is no snapshot, so a failure is reported but not rolled back.
    /// An empty id list is a silent no-op.
    pub fn delete_multiple(&mut self, ids: &[ScheduleId]) -> bool {
        if ids.is_empty() {
            return true;
        }

        self.begin();
        match self.store.bulk_delete(ids) {
            Ok(()) => {
                log::info!("Deleted {} schedule(s)", ids.len());
                self.commit(&format!("Deleted {} time block(s)", ids.len()));
                true
            }
            Err(e) => {
                log::error!("Failed to delete {} schedule(s): {}", ids.len(), e);
                self.fail(e, "Failed to delete time blocks");
                false
            }
        }
    }

    /// Move several schedules by the same offset, keeping their durations.
    ///
    /// Ids that no longer exist are skipped. An empty id list is a silent no-op.
    pub fn reschedule_multiple(&mut self, ids: &[ScheduleId], offset: Duration) -> bool {
        if ids.is_empty() {
            return true;
        }

        self.begin();
        let now = truncate_to_millis((self.clock)());

        let moved: Vec<Schedule> = match self.store.bulk_get(ids) {
            Ok(found) => found
                .into_iter()
                .flatten()
                .map(|schedule| {
                    let mut moved = schedule.shifted(offset);
                    moved.updated_at = now;
                    moved
                })
                .collect(),
            Err(e) => {
                log::error!("Failed to load schedules for rescheduling: {}", e);
                self.fail(e, "Failed to reschedule time blocks");
                return false;
            }
        };

        match self.store.bulk_put(&moved) {
            Ok(()) => {
                log::info!("Rescheduled {} schedule(s) by {}", moved.len(), offset);
                self.commit(&format!("Rescheduled {} time block(s)", moved.len()));
                true
            }
            Err(e) => {
                log::error!("Failed to reschedule {} schedule(s): {}", moved.len(), e);
                self.fail(e, "Failed to reschedule time blocks");
                false
            }
        }
    }

    /// Whether the last batch left the store untouched
    pub fn last_batch_failed(&self) -> bool {
        self.status == MutationStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::ScheduleDraft;
    use crate::services::database::Database;
    use crate::services::notification::{MockOutcomeSink, ToastManager};
    use crate::services::schedule::ScheduleService;
    use crate::services::store::{MockScheduleStore, StoreError};
    use chrono::{DateTime, Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    fn fixed_now() -> DateTime<Local> {
        at(8, 0)
    }

    fn stored(title: &str, hour: u32) -> Schedule {
        Schedule::from_draft(ScheduleDraft::new(title, at(hour, 0), at(hour, 45)), at(7, 0))
    }

    #[test]
    fn test_delete_multiple() {
        let db = Database::open_in_memory().unwrap();
        let store = ScheduleService::new(&db);
        let a = stored("A", 9);
        let b = stored("B", 10);
        let c = stored("C", 11);
        store.bulk_put(&[a.clone(), b.clone(), c.clone()]).unwrap();

        let mut toasts = ToastManager::new();
        let mut mutator = ScheduleMutator::new(&store, &mut toasts);
        assert!(mutator.delete_multiple(&[a.id, c.id]));
        assert_eq!(mutator.status(), MutationStatus::Committed);

        assert_eq!(store.list_all().unwrap(), vec![b]);
        assert_eq!(toasts.latest().unwrap().message, "Deleted 2 time block(s)");
    }

    #[test]
    fn test_empty_batches_are_silent() {
        let store = MockScheduleStore::new();
        let mut sink = MockOutcomeSink::new();
        sink.expect_success().never();
        sink.expect_error().never();

        let mut mutator = ScheduleMutator::new(&store, &mut sink);
        assert!(mutator.delete_multiple(&[]));
        assert!(mutator.reschedule_multiple(&[], Duration::hours(1)));
        assert_eq!(mutator.status(), MutationStatus::Idle);
    }

    #[test]
    fn test_delete_multiple_failure() {
        let mut store = MockScheduleStore::new();
        store
            .expect_bulk_delete()
            .times(1)
            .returning(|_| Err(StoreError::Invalid("locked database".to_string())));
        let mut sink = MockOutcomeSink::new();
        sink.expect_error()
            .withf(|message| message == "Failed to delete time blocks")
            .times(1)
            .return_const(());

        let mut mutator = ScheduleMutator::new(&store, &mut sink);
        assert!(!mutator.delete_multiple(&[ScheduleId::new()]));
        assert!(mutator.last_batch_failed());
    }

    #[test]
    fn test_reschedule_multiple_shifts_and_skips_missing() {
        let db = Database::open_in_memory().unwrap();
        let store = ScheduleService::new(&db);
        let a = stored("A", 9);
        let b = stored("B", 13);
        store.bulk_put(&[a.clone(), b.clone()]).unwrap();

        let mut toasts = ToastManager::new();
        let mut mutator = ScheduleMutator::new(&store, &mut toasts).with_clock(fixed_now);
        assert!(mutator.reschedule_multiple(&[a.id, ScheduleId::new(), b.id], Duration::minutes(90)));

        let moved_a = store.get(&a.id).unwrap().unwrap();
        let moved_b = store.get(&b.id).unwrap().unwrap();
        assert_eq!((moved_a.start, moved_a.end), (at(10, 30), at(11, 15)));
        assert_eq!((moved_b.start, moved_b.end), (at(14, 30), at(15, 15)));
        assert_eq!(moved_a.duration(), a.duration());
        assert_eq!(moved_a.updated_at, fixed_now());
        assert_eq!(store.list_all().unwrap().len(), 2);
        assert_eq!(toasts.latest().unwrap().message, "Rescheduled 2 time block(s)");
    }
}
