//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Longest accepted task title, in characters.
pub(crate) const MAX_TITLE_CHARS: usize = 255;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The title exceeds the maximum length.
    #[error("task title must be at most {MAX_TITLE_CHARS} characters, got {length}")]
    TitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
    },

    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The status string is not one of the known statuses.
    #[error("invalid task status: {0}")]
    InvalidStatus(String),

    /// The requested status change is not allowed from the current status.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task whose status change was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

impl From<ParseTaskStatusError> for TaskDomainError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::InvalidStatus(err.0)
    }
}
