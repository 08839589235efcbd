//! Task status and its transition rules.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task status.
///
/// ```text
/// to_do ──► in_progress ──► done
///   │            │
///   └──► canceled ◄┘
/// ```
///
/// `done` and `canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[serde(rename = "to_do")]
    Todo,
    /// Work is under way.
    InProgress,
    /// The task was abandoned.
    Canceled,
    /// The task was completed.
    Done,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::Canceled, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "to_do",
            Self::InProgress => "in_progress",
            Self::Canceled => "canceled",
            Self::Done => "done",
        }
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Canceled | Self::Done)
    }

    /// Returns `true` when moving from `self` to `target` is allowed.
    ///
    /// Self-transitions are never allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Todo, Self::InProgress | Self::Canceled)
                | (Self::InProgress, Self::Canceled | Self::Done)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "to_do" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "canceled" => Ok(Self::Canceled),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
