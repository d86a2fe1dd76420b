//! Context model for categorizing schedules.
//!
//! A context is a user-defined category with a display color and icon.
//! Schedules reference contexts weakly: deleting a context leaves the
//! schedule's `context_id` dangling, which renders as "no context".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::date::now_millis;

/// Identifier of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ContextId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A category that decorates schedules on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Unique identifier
    pub id: ContextId,
    /// Display name of the context
    pub name: String,
    /// Hex color code (e.g., "#3b82f6")
    pub color: String,
    /// Icon identifier understood by the UI (e.g., "briefcase")
    pub icon: String,
    /// Position in pickers and lists, ascending
    pub sort_order: i32,
    pub created_at: DateTime<Local>,
}

impl Context {
    /// Create a new context with the given name, color and icon.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            id: ContextId::new(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
            sort_order,
            created_at: now_millis(),
        }
    }

    /// Validate the context data.
    pub fn validate(&self) -> Result<(), ContextValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ContextValidationError::EmptyName);
        }
        if name.chars().count() > 50 {
            return Err(ContextValidationError::NameTooLong);
        }

        if !is_valid_hex_color(&self.color) {
            return Err(ContextValidationError::InvalidColor);
        }

        if self.icon.chars().count() > 32 {
            return Err(ContextValidationError::IconTooLong);
        }

        Ok(())
    }
}

/// Validation errors for Context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextValidationError {
    #[error("Context name cannot be empty")]
    EmptyName,
    #[error("Context name must be 50 characters or less")]
    NameTooLong,
    #[error("Invalid color format (use hex like #3b82f6)")]
    InvalidColor,
    #[error("Icon identifier must be 32 characters or less")]
    IconTooLong,
}

/// Check if a string is a valid hex color code.
fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.trim().strip_prefix('#') else {
        return false;
    };
    // Accept 3, 6, or 8 character hex codes
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Contexts seeded into an empty store.
pub fn default_contexts() -> Vec<Context> {
    vec![
        Context::new("Work", "#3b82f6", "briefcase", 0),
        Context::new("Health", "#10b981", "heart", 1),
        Context::new("Personal", "#8b5cf6", "user", 2),
    ]
}
