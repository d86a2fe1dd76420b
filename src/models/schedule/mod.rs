// Schedule module
// Time block model for the day timeline

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::context::ContextId;
use crate::utils::date::truncate_to_millis;

/// Opaque identifier of a schedule, generated client-side at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(Uuid);

impl ScheduleId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ScheduleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ScheduleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Completion state of a schedule.
///
/// The completion instant is kept because it is shown to the user
/// ("Done at 3:42 PM"), so this is not flattened into a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "at", rename_all = "snake_case")]
pub enum Completion {
    #[default]
    Incomplete,
    CompletedAt(DateTime<Local>),
}

impl Completion {
    /// Build from the nullable persisted column
    pub fn from_option(at: Option<DateTime<Local>>) -> Self {
        match at {
            Some(at) => Completion::CompletedAt(at),
            None => Completion::Incomplete,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Completion::CompletedAt(_))
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        match self {
            Completion::CompletedAt(at) => Some(*at),
            Completion::Incomplete => None,
        }
    }
}

/// A titled time block on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub is_locked: bool,
    pub context_id: Option<ContextId>,
    pub completion: Completion,
    pub recurrence_rule: Option<String>, // stored verbatim, never expanded
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Schedule {
    /// Materialize a draft into a full record with a new id.
    ///
    /// Both bookkeeping timestamps are set to `now`. Every timestamp is
    /// truncated to whole milliseconds, the precision the store keeps.
    ///
    /// # Examples
    /// ```
    /// use chronos_planner::models::schedule::{Schedule, ScheduleDraft};
    /// use chrono::{Duration, Local};
    ///
    /// let start = Local::now();
    /// let draft = ScheduleDraft::new("Deep Work", start, start + Duration::hours(2));
    /// let schedule = Schedule::from_draft(draft, Local::now());
    /// assert_eq!(schedule.title, "Deep Work");
    /// assert!(!schedule.completion.is_completed());
    /// ```
    pub fn from_draft(draft: ScheduleDraft, now: DateTime<Local>) -> Self {
        let now = truncate_to_millis(now);
        Self {
            id: ScheduleId::new(),
            title: draft.title,
            start: truncate_to_millis(draft.start),
            end: truncate_to_millis(draft.end),
            is_locked: draft.is_locked,
            context_id: draft.context_id,
            completion: Completion::from_option(draft.completion.completed_at().map(truncate_to_millis)),
            recurrence_rule: draft.recurrence_rule,
            created_at: now,
            updated_at: now,
        }
    }

    /// The interval shape used by grouping and validation
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            id: self.id,
            start: self.start,
            end: self.end,
        }
    }

    /// Get the planned duration of the block
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    /// Half-open overlap test against an arbitrary interval
    pub fn overlaps(&self, start: DateTime<Local>, end: DateTime<Local>) -> bool {
        self.start < end && self.end > start
    }

    /// Check if this schedule carries a recurrence rule
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule
            .as_deref()
            .is_some_and(|rule| !rule.trim().is_empty())
    }

    /// Apply a partial update in place. Absent patch fields are left untouched.
    pub fn apply(&mut self, patch: &SchedulePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(is_locked) = patch.is_locked {
            self.is_locked = is_locked;
        }
        if let Some(context_id) = patch.context_id {
            self.context_id = context_id;
        }
        if let Some(completion) = patch.completion {
            self.completion = completion;
        }
        if let Some(rule) = &patch.recurrence_rule {
            self.recurrence_rule = rule.clone();
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at;
        }
    }

    /// Shift both ends of the block by the same offset
    pub fn shifted(&self, offset: Duration) -> Self {
        let mut moved = self.clone();
        moved.start = self.start + offset;
        moved.end = self.end + offset;
        moved
    }
}

/// Creation input: everything except identity and bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDraft {
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub is_locked: bool,
    pub context_id: Option<ContextId>,
    pub completion: Completion,
    pub recurrence_rule: Option<String>,
}

impl ScheduleDraft {
    pub fn new(title: impl Into<String>, start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            is_locked: false,
            context_id: None,
            completion: Completion::Incomplete,
            recurrence_rule: None,
        }
    }

    /// Mark the block as a hard commitment
    pub fn locked(mut self, is_locked: bool) -> Self {
        self.is_locked = is_locked;
        self
    }

    pub fn context(mut self, context_id: ContextId) -> Self {
        self.context_id = Some(context_id);
        self
    }

    /// Set the recurrence rule (RRULE format, not interpreted)
    pub fn recurrence_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }
}

/// Partial update for an existing schedule.
///
/// Nullable fields use a nested `Option` so that "clear the value"
/// (`Some(None)`) is distinct from "leave unchanged" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulePatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Local>>,
    pub end: Option<DateTime<Local>>,
    pub is_locked: Option<bool>,
    pub context_id: Option<Option<ContextId>>,
    pub completion: Option<Completion>,
    pub recurrence_rule: Option<Option<String>>,
    pub updated_at: Option<DateTime<Local>>,
}

impl SchedulePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Move the block to a new interval
    pub fn times(mut self, start: DateTime<Local>, end: DateTime<Local>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn locked(mut self, is_locked: bool) -> Self {
        self.is_locked = Some(is_locked);
        self
    }

    pub fn context(mut self, context_id: Option<ContextId>) -> Self {
        self.context_id = Some(context_id);
        self
    }

    pub fn completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn recurrence_rule(mut self, rule: Option<String>) -> Self {
        self.recurrence_rule = Some(rule);
        self
    }

    pub fn touched_at(mut self, at: DateTime<Local>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// True when the patch would change nothing besides bookkeeping
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.is_locked.is_none()
            && self.context_id.is_none()
            && self.completion.is_none()
            && self.recurrence_rule.is_none()
    }
}

/// Minimal interval shape the grouping and validation algorithms work on.
/// Always derived from a schedule for one computation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub id: ScheduleId,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl TimeRange {
    pub fn new(id: ScheduleId, start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self { id, start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    fn sample() -> Schedule {
        Schedule::from_draft(ScheduleDraft::new("Standup", at(9, 0), at(9, 30)), at(8, 0))
    }

    #[test]
    fn test_from_draft_assigns_bookkeeping() {
        let schedule = sample();
        assert_eq!(schedule.title, "Standup");
        assert_eq!(schedule.created_at, at(8, 0));
        assert_eq!(schedule.updated_at, at(8, 0));
        assert!(!schedule.is_locked);
        assert_eq!(schedule.completion, Completion::Incomplete);
    }

    #[test]
    fn test_from_draft_generates_distinct_ids() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_draft_builder_fields() {
        let context = ContextId::new();
        let draft = ScheduleDraft::new("Gym", at(18, 0), at(19, 0))
            .locked(true)
            .context(context)
            .recurrence_rule("FREQ=WEEKLY;BYDAY=MO");

        assert!(draft.is_locked);
        assert_eq!(draft.context_id, Some(context));
        assert_eq!(draft.recurrence_rule.as_deref(), Some("FREQ=WEEKLY;BYDAY=MO"));
    }

    #[test]
    fn test_duration() {
        assert_eq!(sample().duration(), Duration::minutes(30));
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let schedule = sample();
        assert!(schedule.overlaps(at(9, 15), at(10, 0)));
        assert!(!schedule.overlaps(at(9, 30), at(10, 0)));
        assert!(!schedule.overlaps(at(8, 0), at(9, 0)));
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut schedule = sample();
        let original = schedule.clone();

        schedule.apply(&SchedulePatch::new().title("Retro"));

        assert_eq!(schedule.title, "Retro");
        assert_eq!(schedule.start, original.start);
        assert_eq!(schedule.end, original.end);
        assert_eq!(schedule.updated_at, original.updated_at);
    }

    #[test]
    fn test_apply_patch_clears_nullable_fields() {
        let mut schedule = sample();
        schedule.context_id = Some(ContextId::new());
        schedule.recurrence_rule = Some("FREQ=DAILY".to_string());

        schedule.apply(&SchedulePatch::new().context(None).recurrence_rule(None));

        assert!(schedule.context_id.is_none());
        assert!(schedule.recurrence_rule.is_none());
    }

    #[test]
    fn test_completion_round_trip_through_option() {
        let done = Completion::from_option(Some(at(10, 0)));
        assert!(done.is_completed());
        assert_eq!(done.completed_at(), Some(at(10, 0)));
        assert_eq!(Completion::from_option(None), Completion::Incomplete);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(SchedulePatch::new().is_empty());
        assert!(SchedulePatch::new().touched_at(at(9, 0)).is_empty());
        assert!(!SchedulePatch::new().locked(true).is_empty());
    }

    #[test]
    fn test_shifted_keeps_duration() {
        let moved = sample().shifted(Duration::hours(2));
        assert_eq!(moved.start, at(11, 0));
        assert_eq!(moved.end, at(11, 30));
    }

    #[test]
    fn test_is_recurring_ignores_blank_rules() {
        let mut schedule = sample();
        assert!(!schedule.is_recurring());
        schedule.recurrence_rule = Some("  ".to_string());
        assert!(!schedule.is_recurring());
        schedule.recurrence_rule = Some("FREQ=DAILY".to_string());
        assert!(schedule.is_recurring());
    }

    #[test]
    fn test_schedule_id_parses_its_display_form() {
        let id = ScheduleId::new();
        let parsed: ScheduleId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<ScheduleId>().is_err());
    }
}
