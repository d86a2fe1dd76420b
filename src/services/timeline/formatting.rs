//! Display strings for the timeline: hour labels, times, ranges, durations.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Timelike};
use serde::Serialize;

use crate::models::settings::HOURS_PER_DAY;

/// A time broken into its display parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTime {
    /// "9:30 AM"
    pub time: String,
    /// "9:30a"
    pub compact: String,
    pub hours: String,
    /// Always two digits
    pub minutes: String,
    pub period: &'static str,
}

/// One entry of the horizontal day picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySelectorDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub day_of_month: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_schedules: bool,
}

fn period(hour24: u32) -> &'static str {
    if hour24 >= 12 {
        "PM"
    } else {
        "AM"
    }
}

fn twelve_hour(hour24: u32) -> u32 {
    match hour24 % 12 {
        0 => 12,
        h => h,
    }
}

/// "9 AM", or "9a" when compact. Midnight is 12 AM.
pub fn format_hour_label(hour: u32, compact: bool) -> String {
    let period = period(hour);
    let display = twelve_hour(hour);

    if compact {
        format!("{}{}", display, period[..1].to_lowercase())
    } else {
        format!("{} {}", display, period)
    }
}

pub fn hour_labels(compact: bool) -> Vec<String> {
    (0..HOURS_PER_DAY)
        .map(|hour| format_hour_label(hour, compact))
        .collect()
}

pub fn format_time(timestamp: DateTime<Local>) -> FormattedTime {
    let period = period(timestamp.hour());
    let hours = twelve_hour(timestamp.hour()).to_string();
    let minutes = format!("{:02}", timestamp.minute());

    FormattedTime {
        time: format!("{}:{} {}", hours, minutes, period),
        compact: format!("{}:{}{}", hours, minutes, period[..1].to_lowercase()),
        hours,
        minutes,
        period,
    }
}

/// "9:00 - 10:30 AM" when both ends share a period, else "11:00 AM - 1:00 PM"
pub fn format_time_range(start: DateTime<Local>, end: DateTime<Local>) -> String {
    let start = format_time(start);
    let end = format_time(end);

    if start.period == end.period {
        format!("{}:{} - {}", start.hours, start.minutes, end.time)
    } else {
        format!("{} - {}", start.time, end.time)
    }
}

/// "45m", "2h", "1h 30m"
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, rest)
    }
}

/// Whole minutes between the two instants, formatted
pub fn format_duration_between(start: DateTime<Local>, end: DateTime<Local>) -> String {
    format_duration((end - start).num_minutes())
}

/// "Today", "Tomorrow", "Yesterday", otherwise "Mon, Dec 30"
pub fn format_relative_day(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a, %b %-d").to_string(),
    }
}

/// Label for the current-time indicator, e.g. "3:42 PM"
pub fn format_current_time_indicator(now: DateTime<Local>) -> String {
    format_time(now).time
}

pub fn format_completed_at(completed_at: DateTime<Local>) -> String {
    format!("Done at {}", format_time(completed_at).time)
}

/// Midnight, 6 AM, noon and 6 PM
pub fn is_major_hour(hour: u32) -> bool {
    matches!(hour, 0 | 6 | 12 | 18)
}

pub fn is_noon_or_midnight(hour: u32) -> bool {
    matches!(hour, 0 | 12)
}

/// Days `center - buffer ..= center + buffer` for the day picker.
///
/// `has_schedules` starts false; callers fill it from the store.
pub fn day_selector_days(
    center: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
    buffer_days: i64,
) -> Vec<DaySelectorDay> {
    (-buffer_days..=buffer_days)
        .filter_map(|offset| center.checked_add_signed(Duration::days(offset)))
        .map(|date| DaySelectorDay {
            date,
            day_of_week: date.format("%a").to_string(),
            day_of_month: date.day(),
            is_today: date == today,
            is_selected: date == selected,
            has_schedules: false,
        })
        .collect()
}
