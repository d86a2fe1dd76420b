// Test fixtures - reusable test data
// Provides consistent schedules and dates across the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use chronos_planner::models::schedule::{Schedule, ScheduleDraft};
use chronos_planner::utils::date::DayBounds;

/// Install the test logger once per binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Friday, March 14, 2025
    pub fn pi_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    pub fn pi_day_bounds() -> DayBounds {
        DayBounds::for_date(pi_day())
    }

    /// Local time on `pi_day`
    pub fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    /// A morning instant before every fixture block
    pub fn early_morning() -> DateTime<Local> {
        at(6, 0)
    }
}

/// Sample schedules for testing
pub mod schedules {
    use super::dates::{at, early_morning};
    use super::*;

    pub fn block(title: &str, start: (u32, u32), end: (u32, u32)) -> Schedule {
        Schedule::from_draft(
            ScheduleDraft::new(title, at(start.0, start.1), at(end.0, end.1)),
            early_morning(),
        )
    }

    pub fn locked_block(title: &str, start: (u32, u32), end: (u32, u32)) -> Schedule {
        let mut schedule = block(title, start, end);
        schedule.is_locked = true;
        schedule
    }

    /// 09:00-09:30, 09:15-10:00 and 10:00-10:30
    pub fn morning_chain() -> Vec<Schedule> {
        vec![
            block("Standup", (9, 0), (9, 30)),
            block("Review", (9, 15), (10, 0)),
            block("Planning", (10, 0), (10, 30)),
        ]
    }
}
