//! Service layer for task creation, editing, listing and status changes.

use crate::context::RequestContext;
use crate::pagination::{ListLimits, ListResult};
use crate::task::{
    domain::{Task, TaskDescription, TaskDomainError, TaskId, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
}

impl CreateTaskRequest {
    /// Creates a request. Values are trimmed and validated by the service.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Request payload for a partial task edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    id: TaskId,
    title: Option<String>,
    description: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates an edit request that changes nothing yet.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            title: None,
            description: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for listing tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTasksRequest {
    status: Option<String>,
    page: u32,
    limit: Option<u32>,
}

impl Default for ListTasksRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ListTasksRequest {
    /// Requests the first page of all tasks with the default page size.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: None,
            page: 1,
            limit: None,
        }
    }

    /// Restricts the listing to a status, given by its storage name.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Selects a 1-based page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Requests a page size. Zero selects the default; oversized values are
    /// clamped to the configured maximum.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
///
/// The repository may be the raw adapter or the caching decorator; the
/// service cannot tell them apart.
pub struct TaskService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    limits: ListLimits,
}

impl<R, C> Clone for TaskService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            limits: self.limits,
        }
    }
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, limits: ListLimits) -> Self {
        Self {
            repository,
            clock,
            limits,
        }
    }

    /// Returns the page size limits applied to listings.
    #[must_use]
    pub const fn limits(&self) -> ListLimits {
        self.limits
    }

    /// Creates a task in the `to_do` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the title or description is
    /// invalid and [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let CreateTaskRequest { title, description } = request;
        let task_title = TaskTitle::new(title)?;
        let task_description = TaskDescription::new(description)?;
        let task = Task::new(task_title, task_description, &*self.clock);
        self.repository.create(ctx, &task).await?;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist
    /// or the lookup fails.
    pub async fn retrieve(&self, ctx: &RequestContext, id: TaskId) -> TaskServiceResult<Task> {
        Ok(self.repository.retrieve(ctx, id).await?)
    }

    /// Applies a partial edit to the title and description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a new value is invalid and
    /// [`TaskServiceError::Repository`] when the task does not exist or the
    /// update fails.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let UpdateTaskRequest {
            id,
            title,
            description,
        } = request;
        let new_title = title.map(TaskTitle::new).transpose()?;
        let new_description = description.map(TaskDescription::new).transpose()?;

        let mut task = self.repository.retrieve(ctx, id).await?;
        if let Some(value) = new_title {
            task.set_title(value, &*self.clock);
        }
        if let Some(value) = new_description {
            task.set_description(value, &*self.clock);
        }
        self.repository.update(ctx, id, &task).await?;
        Ok(task)
    }

    /// Soft-deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task does not exist
    /// or the delete fails.
    pub async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskServiceResult<()> {
        Ok(self.repository.delete(ctx, id).await?)
    }

    /// Lists tasks newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatus`] for an unknown status filter
    /// and [`TaskServiceError::Repository`] when the query fails.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        request: ListTasksRequest,
    ) -> TaskServiceResult<ListResult<Task>> {
        let ListTasksRequest {
            status,
            page,
            limit,
        } = request;
        let status_filter = status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()
            .map_err(TaskDomainError::from)?;
        let page_request = self.limits.page_request(page, limit);
        Ok(self
            .repository
            .list_paginated(ctx, status_filter, page_request)
            .await?)
    }

    /// Moves a task to a new status, stamping `started_at` or `finished_at`
    /// on first entry into the corresponding status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatus`] for an unknown status,
    /// [`TaskDomainError::InvalidStatusTransition`] when the move is not
    /// allowed, and [`TaskServiceError::Repository`] when the task does not
    /// exist or the update fails.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        status: &str,
    ) -> TaskServiceResult<Task> {
        let target = TaskStatus::try_from(status).map_err(TaskDomainError::from)?;
        let mut task = self.repository.retrieve(ctx, id).await?;
        let change = task.transition_to(target, &*self.clock)?;
        self.repository.update_status(ctx, id, &change).await?;
        Ok(task)
    }
}
