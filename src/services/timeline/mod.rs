//! Timeline layout engine.
//!
//! Pure functions that turn a day's schedules into pixel geometry:
//! [`positioning`] maps time to the vertical axis, [`overlap`] groups
//! concurrent blocks into columns, and [`layout`] combines both for a whole
//! day. [`formatting`] holds the display strings shown next to the axis.

pub mod formatting;
pub mod layout;
pub mod overlap;
pub mod positioning;

pub use layout::{compute_day_layout, DayLayout, PositionedSchedule};
pub use overlap::{
    find_overlapping, has_overlap, overlap_groups, schedule_column, schedules_to_ranges,
    OverlapGroup,
};
pub use positioning::{
    block_area_width, calculate_block_position, current_time_y, current_time_y_at,
    scroll_position_for_time, snap_to_interval, timeline_height, timestamp_to_y, y_to_timestamp,
    BlockPosition, BlockRect, CalcLength,
};
