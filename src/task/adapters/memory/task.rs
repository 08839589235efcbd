//! In-memory repository for tasks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::context::RequestContext;
use crate::pagination::{ListResult, PageRequest};
use crate::task::{
    domain::{PersistedTaskData, StatusChange, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::team::domain::TeamId;

/// Thread-safe in-memory task repository.
///
/// Mirrors the relational adapter: row identifiers are assigned on insert,
/// deletes are soft, and listings use the same ordering. Team references are
/// not checked against any team store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    last_record_id: i64,
}

#[derive(Debug, Clone)]
struct StoredTask {
    task: Task,
    deleted: bool,
}

impl InMemoryTaskState {
    fn live(&self, id: TaskId) -> Option<&Task> {
        self.tasks
            .get(&id)
            .filter(|stored| !stored.deleted)
            .map(|stored| &stored.task)
    }

    fn live_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks
            .get_mut(&id)
            .filter(|stored| !stored.deleted)
            .map(|stored| &mut stored.task)
    }

    fn sorted_live<P>(&self, predicate: P) -> Vec<Task>
    where
        P: Fn(&Task) -> bool,
    {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|stored| !stored.deleted && predicate(&stored.task))
            .map(|stored| stored.task.clone())
            .collect();
        tasks.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.record_id().cmp(&a.record_id()))
        });
        tasks
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Copies the editable fields of `incoming` onto `existing`.
fn merge_editable(existing: &Task, incoming: &Task) -> Task {
    Task::from_persisted(PersistedTaskData {
        record_id: existing.record_id(),
        id: existing.id(),
        title: incoming.title().clone(),
        description: incoming.description().clone(),
        status: existing.status(),
        team_id: incoming.team_id(),
        started_at: existing.started_at(),
        finished_at: existing.finished_at(),
        created_at: existing.created_at(),
        updated_at: incoming.updated_at(),
    })
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<()> {
        ctx.check()?;
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state.last_record_id += 1;
        let mut stored = task.clone();
        stored.set_record_id(state.last_record_id);
        state.tasks.insert(
            task.id(),
            StoredTask {
                task: stored,
                deleted: false,
            },
        );
        Ok(())
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<Task> {
        ctx.check()?;
        let state = self.read()?;
        state
            .live(id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        task: &Task,
    ) -> TaskRepositoryResult<()> {
        ctx.check()?;
        let mut state = self.write()?;
        let existing = state
            .live_mut(id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        *existing = merge_editable(existing, task);
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()> {
        ctx.check()?;
        let mut state = self.write()?;
        match state.tasks.get_mut(&id) {
            Some(stored) if !stored.deleted => {
                stored.deleted = true;
                Ok(())
            }
            _ => Err(TaskRepositoryError::NotFound(id)),
        }
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        status: Option<TaskStatus>,
        page: PageRequest,
    ) -> TaskRepositoryResult<ListResult<Task>> {
        ctx.check()?;
        let state = self.read()?;
        let matching = state.sorted_live(|task| status.is_none_or(|wanted| task.status() == wanted));
        drop(state);

        let total = u64::try_from(matching.len()).map_err(TaskRepositoryError::persistence)?;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(skip).take(take).collect();
        Ok(ListResult::new(items, page, total))
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()> {
        ctx.check()?;
        let mut state = self.write()?;
        let existing = state
            .live_mut(id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        existing.apply_status_change(change);
        Ok(())
    }

    async fn list_by_team(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        ctx.check()?;
        let state = self.read()?;
        Ok(state.sorted_live(|task| task.team_id() == Some(team_id)))
    }
}
