// Settings module
// Timeline geometry and validation defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const HOUR_HEIGHT_PX: f64 = 60.0;
/// Minimum touch target height for a block
pub const MIN_BLOCK_HEIGHT_PX: f64 = 44.0;
pub const TIME_GUTTER_WIDTH_PX: f64 = 56.0;
pub const BLOCK_HORIZONTAL_PADDING_PX: f64 = 8.0;
pub const BLOCK_GAP_PX: f64 = 2.0;
pub const SNAP_INTERVAL_MINUTES: u32 = 15;
pub const MIN_DURATION_MINUTES: i64 = 15;
pub const HOURS_PER_DAY: u32 = 24;

/// Tunable geometry of the 24-hour timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Pixels per hour on the vertical axis
    pub hour_height: f64,
    pub min_block_height: f64,
    pub gutter_width: f64,
    pub block_horizontal_padding: f64,
    /// Gap between side-by-side columns of an overlap group
    pub block_gap: f64,
    pub snap_interval_minutes: u32,
    pub min_duration_minutes: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            hour_height: HOUR_HEIGHT_PX,
            min_block_height: MIN_BLOCK_HEIGHT_PX,
            gutter_width: TIME_GUTTER_WIDTH_PX,
            block_horizontal_padding: BLOCK_HORIZONTAL_PADDING_PX,
            block_gap: BLOCK_GAP_PX,
            snap_interval_minutes: SNAP_INTERVAL_MINUTES,
            min_duration_minutes: MIN_DURATION_MINUTES,
        }
    }
}

impl TimelineConfig {
    /// Total height of the 24-hour axis in pixels
    pub fn timeline_height(&self) -> f64 {
        f64::from(HOURS_PER_DAY) * self.hour_height
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.hour_height.is_finite() && self.hour_height > 0.0) {
            return Err("hour_height must be a positive number".to_string());
        }

        if !(self.min_block_height.is_finite() && self.min_block_height >= 0.0) {
            return Err("min_block_height cannot be negative".to_string());
        }

        for (name, value) in [
            ("gutter_width", self.gutter_width),
            ("block_horizontal_padding", self.block_horizontal_padding),
            ("block_gap", self.block_gap),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} cannot be negative", name));
            }
        }

        if self.snap_interval_minutes == 0 || self.snap_interval_minutes > 60 {
            return Err("snap_interval_minutes must be between 1 and 60".to_string());
        }

        if self.min_duration_minutes < 0 {
            return Err("min_duration_minutes cannot be negative".to_string());
        }

        Ok(())
    }
}

/// Contents of the planner's TOML settings file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Let new blocks start before the current time
    pub allow_past_times: bool,
    /// Overrides the platform data directory when set
    pub database_path: Option<PathBuf>,
    pub timeline: TimelineConfig,
}

impl PlannerSettings {
    pub fn validate(&self) -> Result<(), String> {
        self.timeline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimelineConfig::default();
        assert_eq!(config.hour_height, 60.0);
        assert_eq!(config.min_block_height, 44.0);
        assert_eq!(config.snap_interval_minutes, 15);
        assert_eq!(config.timeline_height(), 1440.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_hour_height() {
        let config = TimelineConfig {
            hour_height: 0.0,
            ..TimelineConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("hour_height"));
    }

    #[test]
    fn test_validate_rejects_negative_gap() {
        let config = TimelineConfig {
            block_gap: -1.0,
            ..TimelineConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("block_gap"));
    }

    #[test]
    fn test_validate_rejects_zero_snap_interval() {
        let config = TimelineConfig {
            snap_interval_minutes: 0,
            ..TimelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_planner_settings_default_timeline() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.timeline, TimelineConfig::default());
        assert!(!settings.allow_past_times);
        assert!(settings.database_path.is_none());
    }
}
