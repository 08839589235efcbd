//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskEditChangeset, TaskRow, TaskStatusChangeset},
    schema::tasks,
};
use crate::context::RequestContext;
use crate::db::{self, DbError, PgPool};
use crate::pagination::{ListResult, PageRequest};
use crate::task::{
    domain::{
        PersistedTaskData, StatusChange, Task, TaskDescription, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::team::domain::TeamId;
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
///
/// Soft-deleted rows (`deleted_at IS NOT NULL`) are excluded from every
/// query.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        if db::is_statement_timeout(&err) {
            Self::DeadlineExceeded
        } else {
            Self::persistence(err)
        }
    }
}

impl From<DbError> for TaskRepositoryError {
    fn from(err: DbError) -> Self {
        Self::persistence(err)
    }
}

/// Maps a write failure, attributing constraint violations to `task_id` and
/// `team_id`.
fn map_write_error(
    err: DieselError,
    task_id: TaskId,
    team_id: Option<TeamId>,
) -> TaskRepositoryError {
    if let DieselError::DatabaseError(kind, _) = &err {
        match (kind, team_id) {
            (DatabaseErrorKind::UniqueViolation, _) => {
                return TaskRepositoryError::DuplicateTask(task_id);
            }
            (DatabaseErrorKind::ForeignKeyViolation, Some(team)) => {
                return TaskRepositoryError::TeamNotFound(team);
            }
            _ => {}
        }
    }
    TaskRepositoryError::from(err)
}

/// Live rows, optionally restricted to one status.
fn live_tasks<'a>(status: Option<&'a str>) -> tasks::BoxedQuery<'a, Pg> {
    let mut query = tasks::table.filter(tasks::deleted_at.is_null()).into_boxed();
    if let Some(wanted) = status {
        query = query.filter(tasks::status.eq(wanted));
    }
    query
}

fn live_task_by_uuid(
    connection: &mut PgConnection,
    id: TaskId,
) -> TaskRepositoryResult<Option<TaskRow>> {
    tasks::table
        .filter(tasks::uuid.eq(id.into_inner()))
        .filter(tasks::deleted_at.is_null())
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::from)
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, ctx: &RequestContext, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let team_id = task.team_id();
        let new_row = to_new_row(task);

        db::run_bounded(&self.pool, ctx, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_write_error(err, task_id, team_id))?;
            Ok(())
        })
        .await
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<Task> {
        db::run_bounded(&self.pool, ctx, move |connection| {
            let row = live_task_by_uuid(connection, id)?
                .ok_or(TaskRepositoryError::NotFound(id))?;
            row_to_task(row)
        })
        .await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        task: &Task,
    ) -> TaskRepositoryResult<()> {
        let team_id = task.team_id();
        let changes = TaskEditChangeset {
            title: task.title().as_str().to_owned(),
            description: task.description().as_str().to_owned(),
            team_id: team_id.map(TeamId::into_inner),
            updated_at: task.updated_at(),
        };

        db::run_bounded(&self.pool, ctx, move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::uuid.eq(id.into_inner()))
                    .filter(tasks::deleted_at.is_null()),
            )
            .set(&changes)
            .execute(connection)
            .map_err(|err| map_write_error(err, id, team_id))?;

            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &RequestContext, id: TaskId) -> TaskRepositoryResult<()> {
        db::run_bounded(&self.pool, ctx, move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::uuid.eq(id.into_inner()))
                    .filter(tasks::deleted_at.is_null()),
            )
            .set(tasks::deleted_at.eq(Some(Utc::now())))
            .execute(connection)?;

            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        status: Option<TaskStatus>,
        page: PageRequest,
    ) -> TaskRepositoryResult<ListResult<Task>> {
        let status_filter = status.map(TaskStatus::as_str);
        let offset = i64::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = i64::from(page.limit());

        db::run_bounded(&self.pool, ctx, move |connection| {
            let total: i64 = live_tasks(status_filter).count().get_result(connection)?;
            let rows = live_tasks(status_filter)
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .offset(offset)
                .limit(limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;

            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            let total_items = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
            Ok(ListResult::new(items, page, total_items))
        })
        .await
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: TaskId,
        change: &StatusChange,
    ) -> TaskRepositoryResult<()> {
        let changes = TaskStatusChangeset {
            status: change.status.as_str().to_owned(),
            started_at: change.started_at,
            finished_at: change.finished_at,
            updated_at: change.updated_at,
        };

        db::run_bounded(&self.pool, ctx, move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::uuid.eq(id.into_inner()))
                    .filter(tasks::deleted_at.is_null()),
            )
            .set(&changes)
            .execute(connection)?;

            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn list_by_team(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        db::run_bounded(&self.pool, ctx, move |connection| {
            let rows = tasks::table
                .filter(tasks::team_id.eq(team_id.into_inner()))
                .filter(tasks::deleted_at.is_null())
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        uuid: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        team_id: task.team_id().map(TeamId::into_inner),
        started_at: task.started_at(),
        finished_at: task.finished_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        uuid,
        title,
        description,
        status,
        team_id,
        started_at,
        finished_at,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        record_id: Some(id),
        id: TaskId::from_uuid(uuid),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description: TaskDescription::new(description)
            .map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        team_id: team_id.map(TeamId::from_uuid),
        started_at,
        finished_at,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
