//! Repository port for task persistence and listing.

use crate::context::{DeadlineExceeded, RequestContext};
use crate::pagination::{ListResult, PageRequest};
use crate::task::domain::{StatusChange, Task, TaskId, TaskStatus};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Soft-deleted tasks are invisible to every operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier
    /// already exists and [`TaskRepositoryError::TeamNotFound`] when the team
    /// reference does not resolve.
    async fn create(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<()>;

    /// Loads a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn retrieve(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Persists the editable fields of an existing task: title, description,
    /// team reference and modification timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no row was affected.
    async fn update(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        task: &Task,
    ) -> TaskRepositoryResult<()>;

    /// Soft-deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no row was affected.
    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()>;

    /// Lists tasks newest first, optionally filtered by status.
    ///
    /// Ordering is `created_at` descending with the row identifier as a
    /// descending tiebreak. A page beyond the end yields no items and the
    /// full total.
    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        status: Option<TaskStatus>,
        page: PageRequest,
    ) -> TaskRepositoryResult<ListResult<Task>>;

    /// Persists a status change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no row was affected.
    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()>;

    /// Returns every task owned by `team_id`, newest first.
    async fn list_by_team(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The referenced team does not exist.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// The request deadline passed before the store answered.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<DeadlineExceeded> for TaskRepositoryError {
    fn from(_: DeadlineExceeded) -> Self {
        Self::DeadlineExceeded
    }
}

#[async_trait]
impl<T> TaskRepository for Arc<T>
where
    T: TaskRepository + ?Sized,
{
    async fn create(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<()> {
        (**self).create(ctx, task).await
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<Task> {
        (**self).retrieve(ctx, id).await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        task: &Task,
    ) -> TaskRepositoryResult<()> {
        (**self).update(ctx, id, task).await
    }

    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()> {
        (**self).delete(ctx, id).await
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        status: Option<TaskStatus>,
        page: PageRequest,
    ) -> TaskRepositoryResult<ListResult<Task>> {
        (**self).list_paginated(ctx, status, page).await
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()> {
        (**self).update_status(ctx, id, change).await
    }

    async fn list_by_team(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        (**self).list_by_team(ctx, team_id).await
    }
}
