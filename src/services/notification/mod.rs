//! Outcome notifications for store mutations.
//!
//! Toasts are brief, non-blocking messages such as "Time block created".
//! The mutation coordinator reports through [`OutcomeSink`]; [`ToastManager`]
//! is the queue a UI drains and renders.

use std::fmt;
use std::time::{Duration, Instant};

/// How long a toast stays visible unless overridden
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Types of toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

impl ToastLevel {
    /// Get the icon for this toast level
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// Receiver of the single outcome message each mutation produces
#[cfg_attr(test, mockall::automock)]
pub trait OutcomeSink {
    fn success(&mut self, message: &str);

    fn error(&mut self, message: &str);
}

/// Queue of active toasts
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, toast: Toast) {
        log::debug!("Toast: {}", toast);
        self.toasts.push(toast);
    }

    /// Remove expired toasts
    pub fn cleanup(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    /// Active toasts, oldest first
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Hand every queued toast to the caller and empty the queue
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

impl OutcomeSink for ToastManager {
    fn success(&mut self, message: &str) {
        self.add(Toast::success(message));
    }

    fn error(&mut self, message: &str) {
        self.add(Toast::error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_queue_toasts_in_order() {
        let mut manager = ToastManager::new();
        OutcomeSink::success(&mut manager, "Time block created");
        OutcomeSink::error(&mut manager, "Failed to delete time block");

        let levels: Vec<ToastLevel> = manager.toasts().iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![ToastLevel::Success, ToastLevel::Error]);
        assert_eq!(manager.latest().unwrap().message, "Failed to delete time block");
    }

    #[test]
    fn test_cleanup_drops_expired() {
        let mut manager = ToastManager::new();
        manager.add(Toast {
            duration: Duration::ZERO,
            ..Toast::error("gone")
        });
        manager.add(Toast::success("kept"));

        manager.cleanup();

        assert_eq!(manager.toasts().len(), 1);
        assert_eq!(manager.toasts()[0].message, "kept");
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut manager = ToastManager::new();
        manager.add(Toast::success("hello"));

        let drained = manager.drain();
        assert_eq!(drained.len(), 1);
        assert!(!manager.has_toasts());
    }

    #[test]
    fn test_display_prefixes_icon() {
        assert_eq!(Toast::success("Time block created").to_string(), "✓ Time block created");
        assert_eq!(Toast::error("Schedule not found").to_string(), "✗ Schedule not found");
    }
}
