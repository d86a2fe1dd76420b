// Property-based tests for the timeline engine
// Random days of blocks must always produce a consistent layout

mod fixtures;

use chrono::{DateTime, Duration, Local, Timelike};
use chronos_planner::models::schedule::{Schedule, ScheduleDraft, TimeRange};
use chronos_planner::services::timeline::{
    has_overlap, overlap_groups, schedules_to_ranges, snap_to_interval, timestamp_to_y,
    y_to_timestamp,
};
use chronos_planner::services::validation::{validate, ValidationOptions};
use fixtures::dates::{early_morning, pi_day_bounds};
use proptest::prelude::*;

fn day_start() -> DateTime<Local> {
    pi_day_bounds().start
}

/// Build schedules from `(start_minute, duration_minutes)` pairs on the fixture day
fn schedules_from(spans: &[(i64, i64)]) -> Vec<Schedule> {
    spans
        .iter()
        .enumerate()
        .map(|(i, (start, duration))| {
            let start = day_start() + Duration::minutes(*start);
            let end = start + Duration::minutes(*duration);
            Schedule::from_draft(ScheduleDraft::new(format!("Block {}", i), start, end), early_morning())
        })
        .collect()
}

/// Largest number of ranges covering a single instant
fn max_concurrency(ranges: &[TimeRange]) -> usize {
    ranges
        .iter()
        .map(|range| {
            ranges
                .iter()
                .filter(|r| r.start <= range.start && range.start < r.end)
                .count()
        })
        .max()
        .unwrap_or(0)
}

fn spans() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0..1380i64, 1..240i64), 0..40)
}

proptest! {
    /// Property: blocks laid end to end never share a group
    #[test]
    fn prop_disjoint_blocks_form_singleton_groups(
        durations in prop::collection::vec(1..90i64, 1..30),
        gaps in prop::collection::vec(0..30i64, 30),
    ) {
        let mut cursor = 0;
        let mut spans = Vec::new();
        for (duration, gap) in durations.iter().zip(gaps.iter()) {
            spans.push((cursor, *duration));
            cursor += duration + gap;
        }

        let ranges = schedules_to_ranges(&schedules_from(&spans));
        let groups = overlap_groups(&ranges);

        prop_assert_eq!(groups.len(), ranges.len());
        for group in &groups {
            prop_assert_eq!(group.len(), 1);
            prop_assert_eq!(group.column_count, 1);
            prop_assert_eq!(group.column_of(&group.members[0]), Some(0));
        }
    }

    /// Property: every block lands in exactly one group
    #[test]
    fn prop_groups_partition_blocks(spans in spans()) {
        let ranges = schedules_to_ranges(&schedules_from(&spans));
        let groups = overlap_groups(&ranges);

        let total: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, ranges.len());
        for range in &ranges {
            let owners = groups.iter().filter(|g| g.column_of(&range.id).is_some()).count();
            prop_assert_eq!(owners, 1);
        }
    }

    /// Property: blocks sharing a column never overlap
    #[test]
    fn prop_same_column_never_overlaps(spans in spans()) {
        let ranges = schedules_to_ranges(&schedules_from(&spans));
        let groups = overlap_groups(&ranges);

        for group in &groups {
            let members: Vec<&TimeRange> = ranges
                .iter()
                .filter(|r| group.column_of(&r.id).is_some())
                .collect();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    if group.column_of(&a.id) == group.column_of(&b.id) {
                        prop_assert!(!has_overlap(a, b));
                    }
                }
            }
        }
    }

    /// Property: a group uses exactly as many columns as its peak concurrency
    #[test]
    fn prop_column_count_matches_peak_concurrency(spans in spans()) {
        let ranges = schedules_to_ranges(&schedules_from(&spans));
        let groups = overlap_groups(&ranges);

        for group in &groups {
            let members: Vec<TimeRange> = ranges
                .iter()
                .filter(|r| group.column_of(&r.id).is_some())
                .copied()
                .collect();
            prop_assert_eq!(group.column_count, max_concurrency(&members));
            for id in &group.members {
                prop_assert!(group.column_of(id).unwrap() < group.column_count);
            }
        }
    }

    /// Property: converting to y and back lands within a minute
    #[test]
    fn prop_y_round_trip(minute in 0..1440i64, hour_height in 20.0..200.0f64) {
        let timestamp = day_start() + Duration::minutes(minute);
        let y = timestamp_to_y(timestamp, day_start(), hour_height);
        let back = y_to_timestamp(y, day_start(), hour_height);

        prop_assert!((back - timestamp).num_seconds().abs() < 60);
    }

    /// Property: snapping to 15 minutes yields a quarter hour close to the input
    #[test]
    fn prop_snap_lands_on_quarter_hours(minute in 0..1440i64, second in 0..60i64) {
        let timestamp = day_start() + Duration::minutes(minute) + Duration::seconds(second);
        let snapped = snap_to_interval(timestamp, 15);

        prop_assert_eq!(snapped.minute() % 15, 0);
        prop_assert_eq!(snapped.second(), 0);
        prop_assert!((snapped - timestamp).num_minutes().abs() <= 8);
    }

    /// Property: an end at or before the start is never valid
    #[test]
    fn prop_inverted_range_rejected(start in 0..1380i64, back in 0..120i64) {
        let start = day_start() + Duration::minutes(start);
        let end = start - Duration::minutes(back);
        let options = ValidationOptions::default().allow_past(true);

        let result = validate(start, end, &[], &options);
        prop_assert!(!result.is_valid);
        prop_assert!(result.has("invalid_range"));
    }

    /// Property: overlap is exactly the half-open interval test
    #[test]
    fn prop_has_overlap_is_half_open(
        a_start in 0..1380i64,
        a_len in 1..240i64,
        b_start in 0..1380i64,
        b_len in 1..240i64,
    ) {
        let ranges = schedules_to_ranges(&schedules_from(&[(a_start, a_len), (b_start, b_len)]));
        let (a, b) = (&ranges[0], &ranges[1]);

        let expected = a.start < b.end && a.end > b.start;
        prop_assert_eq!(has_overlap(a, b), expected);
        prop_assert_eq!(has_overlap(b, a), expected);
        if a.end <= b.start || b.end <= a.start {
            prop_assert!(!has_overlap(a, b));
        }
    }

    /// Property: overlapping a locked block is invalid whatever the other settings
    #[test]
    fn prop_locked_overlap_blocks(
        locked_start in 0..1200i64,
        locked_len in 15..120i64,
        offset_pct in 0..100i64,
        len in 1..120i64,
        min_duration in 0..60i64,
        allow_past in any::<bool>(),
    ) {
        let mut locked = schedules_from(&[(locked_start, locked_len)]);
        locked[0].is_locked = true;

        let start = locked[0].start + Duration::minutes(locked_len * offset_pct / 100);
        let end = start + Duration::minutes(len);
        let options = ValidationOptions::default()
            .min_duration(min_duration)
            .allow_past(allow_past)
            .at(early_morning());
        let result = validate(start, end, &locked, &options);

        prop_assert!(!result.is_valid);
        prop_assert!(result.has("locked_overlap"));
        prop_assert_eq!(result.errors.iter().find_map(|e| e.conflicting_block_id()), Some(locked[0].id));
    }

    /// Property: overlapping only unlocked blocks stays valid with a warning
    #[test]
    fn prop_unlocked_overlap_is_advisory(
        existing_start in 0..1200i64,
        existing_len in 15..120i64,
        offset_pct in 0..100i64,
        len in 15..120i64,
    ) {
        let existing = schedules_from(&[(existing_start, existing_len)]);

        let start = existing[0].start + Duration::minutes(existing_len * offset_pct / 100);
        let end = start + Duration::minutes(len);
        let options = ValidationOptions::default().allow_past(true);
        let result = validate(start, end, &existing, &options);

        prop_assert!(result.is_valid);
        prop_assert!(result.has("overlap"));
        prop_assert!(result.warnings().count() >= 1);
    }
}
