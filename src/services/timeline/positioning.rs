//! Time ↔ pixel transforms and block geometry.
//!
//! Every vertical coordinate is measured from an explicit `day_start`, never
//! from the wall-clock fields of the timestamp, so days with a DST shift
//! still map one elapsed minute to one minute of axis.

use std::fmt;

use chrono::{DateTime, Duration, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::settings::{TimelineConfig, HOURS_PER_DAY};

const MILLIS_PER_MINUTE: f64 = 60_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A CSS-style `calc(percent% ± px)` length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcLength {
    pub percent: f64,
    pub px: f64,
}

impl CalcLength {
    pub fn new(percent: f64, px: f64) -> Self {
        Self { percent, px }
    }

    /// Resolve against a concrete container width in pixels
    pub fn resolve(&self, container_width: f64) -> f64 {
        container_width * self.percent / 100.0 + self.px
    }
}

impl fmt::Display for CalcLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.px < 0.0 {
            write!(f, "calc({}% - {}px)", self.percent, -self.px)
        } else {
            write!(f, "calc({}% + {}px)", self.percent, self.px)
        }
    }
}

/// Rendering geometry of one block inside the day column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPosition {
    pub top: f64,
    pub height: f64,
    pub left: CalcLength,
    pub width: CalcLength,
    pub column: usize,
    pub total_columns: usize,
}

/// Absolute pixel rectangle of a block inside the timeline viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BlockPosition {
    /// Resolve against a viewport `viewport_width` pixels wide.
    ///
    /// Blocks sit to the right of the hour-label gutter, so percentages are
    /// taken of the width remaining after `gutter_width`.
    pub fn resolve(&self, viewport_width: f64, config: &TimelineConfig) -> BlockRect {
        let area = block_area_width(viewport_width, config);
        BlockRect {
            x: config.gutter_width + self.left.resolve(area),
            y: self.top,
            width: self.width.resolve(area).max(0.0),
            height: self.height,
        }
    }
}

/// Width available to blocks once the hour-label gutter is taken
pub fn block_area_width(viewport_width: f64, config: &TimelineConfig) -> f64 {
    (viewport_width - config.gutter_width).max(0.0)
}

/// Elapsed minutes from `from` to `to`, with millisecond precision
pub(crate) fn minutes_between(from: DateTime<Local>, to: DateTime<Local>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_MINUTE
}

/// Vertical offset of `timestamp` below `day_start`.
///
/// Negative when the timestamp precedes the day.
pub fn timestamp_to_y(timestamp: DateTime<Local>, day_start: DateTime<Local>, hour_height: f64) -> f64 {
    minutes_between(day_start, timestamp) / 60.0 * hour_height
}

/// Inverse of [`timestamp_to_y`], exact to the millisecond.
///
/// A non-finite offset or one that overflows the calendar yields `day_start`.
pub fn y_to_timestamp(y: f64, day_start: DateTime<Local>, hour_height: f64) -> DateTime<Local> {
    if hour_height <= 0.0 {
        return day_start;
    }

    let millis = (y / hour_height * MILLIS_PER_HOUR).round();
    if !millis.is_finite() {
        return day_start;
    }

    Duration::try_milliseconds(millis as i64)
        .and_then(|offset| day_start.checked_add_signed(offset))
        .unwrap_or(day_start)
}

/// Round the local minute component to the nearest multiple of `interval_minutes`.
///
/// Seconds are dropped before rounding and never influence it. Halfway values
/// round up, and rounding up to 60 rolls into the next hour. An interval of
/// zero is treated as one minute.
pub fn snap_to_interval(timestamp: DateTime<Local>, interval_minutes: u32) -> DateTime<Local> {
    let interval = i64::from(interval_minutes.max(1));
    let minute = i64::from(timestamp.minute());
    let snapped = (2 * minute + interval) / (2 * interval) * interval;

    let top_of_hour = timestamp
        - Duration::minutes(minute)
        - Duration::seconds(i64::from(timestamp.second()))
        - Duration::nanoseconds(i64::from(timestamp.nanosecond()));

    top_of_hour + Duration::minutes(snapped)
}

/// Y of the current instant, or `None` when now is outside the day
pub fn current_time_y(day_start: DateTime<Local>, hour_height: f64) -> Option<f64> {
    current_time_y_at(Local::now(), day_start, hour_height)
}

/// Y of `now` relative to `day_start`; `None` outside `[day_start, day_start + 24h]`
pub fn current_time_y_at(
    now: DateTime<Local>,
    day_start: DateTime<Local>,
    hour_height: f64,
) -> Option<f64> {
    let day_end = day_start + Duration::hours(i64::from(HOURS_PER_DAY));
    if now < day_start || now > day_end {
        return None;
    }

    Some(timestamp_to_y(now, day_start, hour_height))
}

pub fn timeline_height(hour_height: f64) -> f64 {
    f64::from(HOURS_PER_DAY) * hour_height
}

/// Scroll offset that puts `timestamp` a third of the way down the viewport
pub fn scroll_position_for_time(
    timestamp: DateTime<Local>,
    day_start: DateTime<Local>,
    container_height: f64,
    hour_height: f64,
) -> f64 {
    let y = timestamp_to_y(timestamp, day_start, hour_height);
    (y - container_height / 3.0).max(0.0)
}

/// Pixel height of a block, never below the minimum touch target
pub fn block_height(start: DateTime<Local>, end: DateTime<Local>, config: &TimelineConfig) -> f64 {
    let height = minutes_between(start, end) / 60.0 * config.hour_height;
    height.max(config.min_block_height)
}

pub fn block_top(start: DateTime<Local>, day_start: DateTime<Local>, config: &TimelineConfig) -> f64 {
    timestamp_to_y(start, day_start, config.hour_height)
}

/// Full geometry of a block in column `column` of `total_columns`.
///
/// `total_columns` of zero is treated as one.
pub fn calculate_block_position(
    start: DateTime<Local>,
    end: DateTime<Local>,
    day_start: DateTime<Local>,
    column: usize,
    total_columns: usize,
    config: &TimelineConfig,
) -> BlockPosition {
    let total_columns = total_columns.max(1);
    let top = block_top(start, day_start, config);
    let bottom = timestamp_to_y(end, day_start, config.hour_height);
    let height = (bottom - top).max(config.min_block_height);

    let column_width = 100.0 / total_columns as f64;

    BlockPosition {
        top,
        height,
        left: CalcLength::new(column as f64 * column_width, config.block_horizontal_padding),
        width: CalcLength::new(column_width, -config.block_gap),
        column,
        total_columns,
    }
}
