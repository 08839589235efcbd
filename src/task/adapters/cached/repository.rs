//! Cache-aside decorator over a task repository.

use super::keys::{LIST_KEY_PREFIX, list_cache_key};
use crate::cache::{CacheStore, json};
use crate::context::RequestContext;
use crate::pagination::{ListResult, PageRequest};
use crate::task::{
    domain::{StatusChange, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryResult},
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Task repository that serves paginated listings from a cache.
///
/// Reads of [`TaskRepository::list_paginated`] consult the cache first and
/// repopulate it on a miss. Successful `create`, `update`, `delete` and
/// `update_status` calls delete every listing key. `retrieve` and
/// `list_by_team` go straight to the wrapped repository.
///
/// Cache failures are logged and otherwise ignored, so callers observe the
/// same results with or without the cache. Errors from the wrapped
/// repository are returned unchanged.
pub struct CachedTaskRepository<R, C>
where
    C: ?Sized,
{
    inner: R,
    cache: Arc<C>,
    ttl: Duration,
}

impl<R, C> CachedTaskRepository<R, C>
where
    R: TaskRepository,
    C: CacheStore + ?Sized,
{
    /// Wraps `inner`, caching listings in `cache` for `ttl`.
    #[must_use]
    pub const fn new(inner: R, cache: Arc<C>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// Returns the wrapped repository.
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns the entry lifetime used when populating the cache.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn invalidate_lists(&self, ctx: &RequestContext, operation: &'static str) {
        match json::delete_by_prefix(&*self.cache, ctx, LIST_KEY_PREFIX).await {
            Ok(deleted) => debug!(
                operation,
                deleted,
                provider = self.cache.provider_name(),
                "task list cache invalidated"
            ),
            Err(err) => warn!(
                operation,
                error = %err,
                provider = self.cache.provider_name(),
                correlation_id = ?ctx.correlation_id(),
                "failed to invalidate task list cache"
            ),
        }
    }
}

impl<R, C> fmt::Debug for CachedTaskRepository<R, C>
where
    R: fmt::Debug,
    C: CacheStore + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedTaskRepository")
            .field("inner", &self.inner)
            .field("cache", &self.cache.provider_name())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[async_trait]
impl<R, C> TaskRepository for CachedTaskRepository<R, C>
where
    R: TaskRepository,
    C: CacheStore + ?Sized,
{
    async fn create(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.create(ctx, task).await?;
        self.invalidate_lists(ctx, "create").await;
        Ok(())
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<Task> {
        self.inner.retrieve(ctx, id).await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        task: &Task,
    ) -> TaskRepositoryResult<()> {
        self.inner.update(ctx, id, task).await?;
        self.invalidate_lists(ctx, "update").await;
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()> {
        self.inner.delete(ctx, id).await?;
        self.invalidate_lists(ctx, "delete").await;
        Ok(())
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        status: Option<TaskStatus>,
        page: PageRequest,
    ) -> TaskRepositoryResult<ListResult<Task>> {
        let key = list_cache_key(status, page.page(), page.limit());

        match json::get::<ListResult<Task>, C>(&*self.cache, ctx, &key).await {
            Ok(Some(cached)) => {
                debug!(key = %key, "task list served from cache");
                return Ok(cached);
            }
            Ok(None) => debug!(key = %key, "task list cache miss"),
            Err(err) => warn!(
                key = %key,
                error = %err,
                provider = self.cache.provider_name(),
                correlation_id = ?ctx.correlation_id(),
                "task list cache read failed, falling back to store"
            ),
        }

        let result = self.inner.list_paginated(ctx, status, page).await?;

        if let Err(err) = json::set(&*self.cache, ctx, &key, &result, self.ttl).await {
            warn!(
                key = %key,
                error = %err,
                provider = self.cache.provider_name(),
                correlation_id = ?ctx.correlation_id(),
                "failed to populate task list cache"
            );
        }
        Ok(result)
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()> {
        self.inner.update_status(ctx, id, change).await?;
        self.invalidate_lists(ctx, "update_status").await;
        Ok(())
    }

    async fn list_by_team(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.list_by_team(ctx, team_id).await
    }
}
