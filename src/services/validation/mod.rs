//! Validation of proposed block times.
//!
//! Validation never fails with an `Err`: every rule is evaluated and the
//! violations come back as data, so a form can show all of them at once.
//! Overlap with unlocked blocks is advisory; every other issue, including
//! overlap with a locked block, makes the proposal invalid.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::schedule::{Schedule, ScheduleId};
use crate::models::settings::{TimelineConfig, MIN_DURATION_MINUTES};
use crate::utils::date::DayBounds;

/// One rule violated by a proposed time range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("End time must be after start time")]
    InvalidRange,

    #[error("Duration must be at least {min_duration_minutes} minutes")]
    TooShort { min_duration_minutes: i64 },

    #[error("Start time cannot be in the past")]
    PastTime,

    #[error("Cannot create block: overlaps with {} locked block(s)", .conflicting.len())]
    LockedOverlap { conflicting: Vec<ScheduleId> },

    #[error("This time overlaps with {} existing block(s)", .conflicting.len())]
    Overlap { conflicting: Vec<ScheduleId> },
}

impl ValidationIssue {
    /// Stable machine-readable identifier
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationIssue::InvalidRange => "invalid_range",
            ValidationIssue::TooShort { .. } => "too_short",
            ValidationIssue::PastTime => "past_time",
            ValidationIssue::LockedOverlap { .. } => "locked_overlap",
            ValidationIssue::Overlap { .. } => "overlap",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// First conflicting block, for overlap issues
    pub fn conflicting_block_id(&self) -> Option<ScheduleId> {
        match self {
            ValidationIssue::LockedOverlap { conflicting }
            | ValidationIssue::Overlap { conflicting } => conflicting.first().copied(),
            _ => None,
        }
    }

    /// Whether this issue alone makes the proposal invalid
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ValidationIssue::Overlap { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn has(&self, kind: &str) -> bool {
        self.errors.iter().any(|issue| issue.kind() == kind)
    }

    /// Advisory issues only
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(|issue| !issue.is_blocking())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub min_duration_minutes: i64,
    pub allow_past_times: bool,
    /// The block being edited, ignored for overlap checks
    pub exclude_id: Option<ScheduleId>,
    /// Reference instant for the past-time rule; the current time when `None`
    pub now: Option<DateTime<Local>>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            min_duration_minutes: MIN_DURATION_MINUTES,
            allow_past_times: false,
            exclude_id: None,
            now: None,
        }
    }
}

impl ValidationOptions {
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            min_duration_minutes: config.min_duration_minutes,
            ..Self::default()
        }
    }

    pub fn min_duration(mut self, minutes: i64) -> Self {
        self.min_duration_minutes = minutes;
        self
    }

    pub fn allow_past(mut self, allow: bool) -> Self {
        self.allow_past_times = allow;
        self
    }

    pub fn excluding(mut self, id: ScheduleId) -> Self {
        self.exclude_id = Some(id);
        self
    }

    pub fn at(mut self, now: DateTime<Local>) -> Self {
        self.now = Some(now);
        self
    }
}

fn overlaps_candidate(
    schedule: &Schedule,
    start: DateTime<Local>,
    end: DateTime<Local>,
    exclude_id: Option<&ScheduleId>,
) -> bool {
    exclude_id != Some(&schedule.id) && schedule.overlaps(start, end)
}

/// Ids of every schedule overlapping `[start, end)`, skipping `exclude_id`
pub fn check_for_conflicts(
    start: DateTime<Local>,
    end: DateTime<Local>,
    existing: &[Schedule],
    exclude_id: Option<&ScheduleId>,
) -> Vec<ScheduleId> {
    existing
        .iter()
        .filter(|s| overlaps_candidate(s, start, end, exclude_id))
        .map(|s| s.id)
        .collect()
}

/// Like [`check_for_conflicts`] but only locked schedules count
pub fn check_for_locked_conflicts(
    start: DateTime<Local>,
    end: DateTime<Local>,
    existing: &[Schedule],
    exclude_id: Option<&ScheduleId>,
) -> Vec<ScheduleId> {
    existing
        .iter()
        .filter(|s| s.is_locked && overlaps_candidate(s, start, end, exclude_id))
        .map(|s| s.id)
        .collect()
}

/// Evaluate every rule against a proposed `[start, end)`.
pub fn validate(
    start: DateTime<Local>,
    end: DateTime<Local>,
    existing: &[Schedule],
    options: &ValidationOptions,
) -> ValidationResult {
    let mut errors = Vec::new();

    if end <= start {
        errors.push(ValidationIssue::InvalidRange);
    }

    if (end - start).num_minutes() < options.min_duration_minutes {
        errors.push(ValidationIssue::TooShort {
            min_duration_minutes: options.min_duration_minutes,
        });
    }

    let now = options.now.unwrap_or_else(Local::now);
    if !options.allow_past_times && start < now {
        errors.push(ValidationIssue::PastTime);
    }

    let exclude_id = options.exclude_id.as_ref();
    let locked = check_for_locked_conflicts(start, end, existing, exclude_id);
    let unlocked: Vec<ScheduleId> = check_for_conflicts(start, end, existing, exclude_id)
        .into_iter()
        .filter(|id| !locked.contains(id))
        .collect();

    if !locked.is_empty() {
        errors.push(ValidationIssue::LockedOverlap { conflicting: locked });
    }
    if !unlocked.is_empty() {
        errors.push(ValidationIssue::Overlap {
            conflicting: unlocked,
        });
    }

    ValidationResult {
        is_valid: errors.iter().all(|issue| !issue.is_blocking()),
        errors,
    }
}

/// Validation bound to one set of existing schedules and options
#[derive(Debug, Clone)]
pub struct TimeValidator<'a> {
    existing: &'a [Schedule],
    options: ValidationOptions,
}

impl<'a> TimeValidator<'a> {
    pub fn new(existing: &'a [Schedule], options: ValidationOptions) -> Self {
        Self { existing, options }
    }

    pub fn validate(&self, start: DateTime<Local>, end: DateTime<Local>) -> ValidationResult {
        validate(start, end, self.existing, &self.options)
    }

    pub fn is_valid(&self, start: DateTime<Local>, end: DateTime<Local>) -> bool {
        self.validate(start, end).is_valid
    }

    /// Every overlapping id, locked or not
    pub fn conflicts(&self, start: DateTime<Local>, end: DateTime<Local>) -> Vec<ScheduleId> {
        check_for_conflicts(start, end, self.existing, self.options.exclude_id.as_ref())
    }
}

/// Why a single picked time was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PickerTimeError {
    #[error("Time must be within the selected day")]
    OutsideDay,

    #[error("Time cannot be in the past")]
    InPast,
}

/// Check one time from a picker against the day being edited
pub fn validate_picker_time(
    timestamp: DateTime<Local>,
    day: &DayBounds,
    allow_past: bool,
    now: DateTime<Local>,
) -> Result<(), PickerTimeError> {
    if !day.contains(timestamp) {
        return Err(PickerTimeError::OutsideDay);
    }

    if !allow_past && timestamp < now {
        return Err(PickerTimeError::InPast);
    }

    Ok(())
}
