use thiserror::Error;

use crate::models::context::ContextId;
use crate::models::schedule::ScheduleId;

/// Failures reported by a persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Schedule with id {0} not found")]
    NotFound(ScheduleId),

    #[error("Context with id {0} not found")]
    ContextNotFound(ContextId),

    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Storage error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::ContextNotFound(_))
    }
}
