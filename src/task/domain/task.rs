//! Task aggregate root and its validated fields.

use super::error::MAX_TITLE_CHARS;
use super::{TaskDomainError, TaskId, TaskStatus};
use crate::team::domain::TeamId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task title, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the trimmed value is empty
    /// and [`TaskDomainError::TitleTooLong`] when it exceeds 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length > MAX_TITLE_CHARS {
            return Err(TaskDomainError::TitleTooLong { length });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task description, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the trimmed value is
    /// empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status fields written by a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// New status.
    pub status: TaskStatus,
    /// Start timestamp after the change.
    pub started_at: Option<DateTime<Utc>>,
    /// Finish timestamp after the change.
    pub finished_at: Option<DateTime<Utc>>,
    /// Modification timestamp after the change.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    record_id: Option<i64>,
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
    team_id: Option<TeamId>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Store-assigned row identifier.
    pub record_id: Option<i64>,
    /// Persisted external identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted team reference, if any.
    pub team_id: Option<TeamId>,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the [`TaskStatus::Todo`] status.
    #[must_use]
    pub fn new(title: TaskTitle, description: TaskDescription, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            record_id: None,
            id: TaskId::new(),
            title,
            description,
            status: TaskStatus::Todo,
            team_id: None,
            started_at: None,
            finished_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            record_id: data.record_id,
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            team_id: data.team_id,
            started_at: data.started_at,
            finished_at: data.finished_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the store-assigned row identifier, once persisted.
    #[must_use]
    pub const fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    /// Returns the external task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the owning team, if any.
    #[must_use]
    pub const fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    /// Returns when work started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the task reached a terminal status, if it has.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: TaskDescription, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Associates the task with a team.
    pub fn assign_team(&mut self, team_id: TeamId, clock: &impl Clock) {
        self.team_id = Some(team_id);
        self.touch(clock);
    }

    /// Removes the team association.
    pub fn clear_team(&mut self, clock: &impl Clock) {
        self.team_id = None;
        self.touch(clock);
    }

    /// Checks that the task may move to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the current
    /// status does not allow it.
    pub const fn validate_transition_to(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            })
        }
    }

    /// Stamps the lifecycle timestamps implied by `status`.
    ///
    /// `started_at` is set for [`TaskStatus::InProgress`] and `finished_at`
    /// for the terminal statuses, each only when still unset. Calling this
    /// again with a later timestamp leaves existing values untouched.
    pub const fn ensure_timestamps_for_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        match status {
            TaskStatus::InProgress => {
                if self.started_at.is_none() {
                    self.started_at = Some(at);
                }
            }
            TaskStatus::Done | TaskStatus::Canceled => {
                if self.finished_at.is_none() {
                    self.finished_at = Some(at);
                }
            }
            TaskStatus::Todo => {}
        }
    }

    /// Moves the task to `target`, stamping timestamps from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the current
    /// status does not allow it. The task is left unchanged in that case.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<StatusChange, TaskDomainError> {
        self.validate_transition_to(target)?;
        let timestamp = clock.utc();
        self.ensure_timestamps_for_status(target, timestamp);
        self.status = target;
        self.updated_at = timestamp;
        Ok(self.status_change())
    }

    /// Returns the status fields as a [`StatusChange`].
    #[must_use]
    pub const fn status_change(&self) -> StatusChange {
        StatusChange {
            status: self.status,
            started_at: self.started_at,
            finished_at: self.finished_at,
            updated_at: self.updated_at,
        }
    }

    /// Applies a persisted status change to this snapshot.
    pub(crate) const fn apply_status_change(&mut self, change: &StatusChange) {
        self.status = change.status;
        self.started_at = change.started_at;
        self.finished_at = change.finished_at;
        self.updated_at = change.updated_at;
    }

    /// Records the row identifier assigned by the store.
    pub(crate) const fn set_record_id(&mut self, record_id: i64) {
        self.record_id = Some(record_id);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
