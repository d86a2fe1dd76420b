// Date utility functions
// Local-day bounds and epoch-millisecond conversions

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, SubsecRound, TimeZone};
use serde::{Deserialize, Serialize};

/// Half-open bounds of one local calendar day: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBounds {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl DayBounds {
    /// Bounds of the given local date
    pub fn for_date(date: NaiveDate) -> Self {
        let next = date.succ_opt().unwrap_or(date);
        Self {
            start: start_of_day(date),
            end: start_of_day(next),
        }
    }

    /// Bounds of the local day that contains `timestamp`
    pub fn containing(timestamp: DateTime<Local>) -> Self {
        Self::for_date(timestamp.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Whether an interval overlaps this day (half-open on both sides)
    pub fn overlaps(&self, start: DateTime<Local>, end: DateTime<Local>) -> bool {
        start < self.end && end > self.start
    }

    pub fn contains(&self, timestamp: DateTime<Local>) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    pub fn previous(&self) -> Self {
        Self::for_date(self.date().pred_opt().unwrap_or(self.date()))
    }

    pub fn next(&self) -> Self {
        Self::for_date(self.date().succ_opt().unwrap_or(self.date()))
    }
}

pub fn is_same_day(date1: DateTime<Local>, date2: DateTime<Local>) -> bool {
    date1.date_naive() == date2.date_naive()
}

/// Local midnight of `date`.
///
/// Where a DST transition skips midnight the first instant of the day is
/// used instead; where midnight is ambiguous the earlier instant wins.
pub fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Skipped midnight: step forward until the wall clock exists again.
            (1..=24 * 4)
                .map(|quarter| midnight + Duration::minutes(15 * quarter))
                .find_map(|candidate| Local.from_local_datetime(&candidate).earliest())
                .unwrap_or_else(|| Local.from_utc_datetime(&midnight))
        }
    }
}

/// Convert an instant to epoch milliseconds, the persisted representation
pub fn to_millis(timestamp: DateTime<Local>) -> i64 {
    timestamp.timestamp_millis()
}

/// Drop sub-millisecond precision so the instant survives a store round trip
pub fn truncate_to_millis(timestamp: DateTime<Local>) -> DateTime<Local> {
    timestamp.trunc_subsecs(3)
}

/// The current instant at the precision the store persists
pub fn now_millis() -> DateTime<Local> {
    truncate_to_millis(Local::now())
}

/// Convert epoch milliseconds back to a local instant
pub fn from_millis(millis: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local))
}
