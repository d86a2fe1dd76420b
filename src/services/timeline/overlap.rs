//! Overlap grouping and side-by-side column assignment.
//!
//! Blocks that transitively overlap form one group (a connected component of
//! the overlap graph). Inside a group each block gets the lowest column whose
//! previous occupant has already ended.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::schedule::{Schedule, ScheduleId, TimeRange};

/// One connected component of overlapping blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapGroup {
    /// Member ids in discovery order
    pub members: Vec<ScheduleId>,
    pub column_count: usize,
    pub columns: HashMap<ScheduleId, usize>,
}

impl OverlapGroup {
    pub fn column_of(&self, id: &ScheduleId) -> Option<usize> {
        self.columns.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Half-open interval overlap: touching endpoints do not overlap
pub fn has_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    a.start < b.end && a.end > b.start
}

/// Every range overlapping `target`, excluding ranges that share its id
pub fn find_overlapping(target: &TimeRange, all: &[TimeRange]) -> Vec<TimeRange> {
    all.iter()
        .filter(|range| range.id != target.id && has_overlap(target, range))
        .copied()
        .collect()
}

pub fn schedules_to_ranges(schedules: &[Schedule]) -> Vec<TimeRange> {
    schedules.iter().map(Schedule::time_range).collect()
}

/// Partition `ranges` into overlap groups and assign columns within each.
///
/// Groups come out in order of their earliest block. Every input id appears
/// in exactly one group.
pub fn overlap_groups(ranges: &[TimeRange]) -> Vec<OverlapGroup> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|range| range.start);

    let mut visited: HashSet<ScheduleId> = HashSet::with_capacity(sorted.len());
    let mut groups = Vec::new();

    for seed in &sorted {
        if visited.contains(&seed.id) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::from([*seed]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.id) {
                continue;
            }
            component.push(current);

            for other in &sorted {
                if !visited.contains(&other.id) && has_overlap(&current, other) {
                    queue.push_back(*other);
                }
            }
        }

        groups.push(assign_columns(component));
    }

    groups
}

/// Greedy interval colouring over one component
fn assign_columns(blocks: Vec<TimeRange>) -> OverlapGroup {
    let members: Vec<ScheduleId> = blocks.iter().map(|b| b.id).collect();

    let mut ordered = blocks;
    ordered.sort_by_key(|b| (b.start, b.end));

    let mut columns = HashMap::with_capacity(ordered.len());
    let mut column_ends: Vec<DateTime<Local>> = Vec::new();

    for block in &ordered {
        let column = match column_ends.iter().position(|end| *end <= block.start) {
            Some(free) => free,
            None => {
                column_ends.push(block.end);
                column_ends.len() - 1
            }
        };
        column_ends[column] = block.end;
        columns.insert(block.id, column);
    }

    OverlapGroup {
        members,
        column_count: column_ends.len(),
        columns,
    }
}

/// `(column, total_columns)` for `id`; `(0, 1)` when it is in no group
pub fn schedule_column(id: &ScheduleId, groups: &[OverlapGroup]) -> (usize, usize) {
    groups
        .iter()
        .find_map(|group| group.column_of(id).map(|column| (column, group.column_count)))
        .unwrap_or((0, 1))
}
