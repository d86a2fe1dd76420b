//! Whole-day layout: grouping plus geometry for every visible block.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::overlap::{overlap_groups, schedule_column, schedules_to_ranges, OverlapGroup};
use super::positioning::{calculate_block_position, BlockPosition};
use crate::models::context::{Context, ContextId};
use crate::models::schedule::{Schedule, ScheduleId};
use crate::models::settings::TimelineConfig;
use crate::utils::date::DayBounds;

/// A schedule with its computed geometry and resolved context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedSchedule {
    pub schedule: Schedule,
    pub position: BlockPosition,
    /// `None` when the schedule has no context or its context was deleted
    pub context: Option<Context>,
}

/// Everything a renderer needs to draw one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub day: DayBounds,
    /// Blocks ordered by start, then end
    pub blocks: Vec<PositionedSchedule>,
    pub groups: Vec<OverlapGroup>,
}

impl DayLayout {
    pub fn empty(day: DayBounds) -> Self {
        Self {
            day,
            blocks: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: &ScheduleId) -> Option<&PositionedSchedule> {
        self.blocks.iter().find(|b| b.schedule.id == *id)
    }
}

/// Lay out `schedules` on `day`.
///
/// Schedules are taken as given; callers pass the ones overlapping the day.
/// Blocks reaching outside the day keep their true offsets (a negative top
/// for one that started the previous evening) and are clipped by the renderer.
pub fn compute_day_layout(
    schedules: &[Schedule],
    contexts: &[Context],
    day: DayBounds,
    config: &TimelineConfig,
) -> DayLayout {
    let groups = overlap_groups(&schedules_to_ranges(schedules));
    let contexts_by_id: HashMap<ContextId, &Context> = contexts.iter().map(|c| (c.id, c)).collect();

    let mut ordered: Vec<&Schedule> = schedules.iter().collect();
    ordered.sort_by_key(|s| (s.start, s.end));

    let blocks = ordered
        .into_iter()
        .map(|schedule| {
            let (column, total_columns) = schedule_column(&schedule.id, &groups);
            let position = calculate_block_position(
                schedule.start,
                schedule.end,
                day.start,
                column,
                total_columns,
                config,
            );
            let context = schedule
                .context_id
                .and_then(|id| contexts_by_id.get(&id))
                .map(|c| (*c).clone());

            PositionedSchedule {
                schedule: schedule.clone(),
                position,
                context,
            }
        })
        .collect();

    DayLayout { day, blocks, groups }
}
