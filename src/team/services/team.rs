//! Service layer for teams and task association.

use crate::context::RequestContext;
use crate::pagination::{ListLimits, ListResult};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::team::{
    domain::{Team, TeamDescription, TeamDomainError, TeamId, TeamName},
    ports::{TeamRepository, TeamRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamRequest {
    name: String,
    description: String,
}

impl CreateTeamRequest {
    /// Creates a request. Values are trimmed and validated by the service.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A team together with the tasks it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWithTasks {
    /// The team.
    pub team: Team,
    /// Tasks owned by the team, newest first.
    pub tasks: Vec<Task>,
}

/// Service-level errors for team operations.
#[derive(Debug, Error)]
pub enum TeamServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TeamDomainError),

    /// Team repository operation failed.
    #[error(transparent)]
    TeamRepository(#[from] TeamRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),

    /// The task already belongs to a different team.
    #[error("task {task_id} is already associated with team {current_team}")]
    TaskAssignedToAnotherTeam {
        /// Task being associated.
        task_id: TaskId,
        /// Team the task currently belongs to.
        current_team: TeamId,
    },

    /// The task does not belong to the team it is being removed from.
    #[error("task {task_id} is not associated with team {team_id}")]
    TaskNotInTeam {
        /// Task being disassociated.
        task_id: TaskId,
        /// Team named in the request.
        team_id: TeamId,
    },
}

/// Result type for team service operations.
pub type TeamServiceResult<T> = Result<T, TeamServiceError>;

/// Team orchestration service.
///
/// Task association is written through the task repository so that any
/// caching decorator in front of it invalidates task listings.
pub struct TeamService<T, K, C>
where
    T: TeamRepository + ?Sized,
    K: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    teams: Arc<T>,
    tasks: Arc<K>,
    clock: Arc<C>,
    limits: ListLimits,
}

impl<T, K, C> Clone for TeamService<T, K, C>
where
    T: TeamRepository + ?Sized,
    K: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            teams: Arc::clone(&self.teams),
            tasks: Arc::clone(&self.tasks),
            clock: Arc::clone(&self.clock),
            limits: self.limits,
        }
    }
}

impl<T, K, C> TeamService<T, K, C>
where
    T: TeamRepository + ?Sized,
    K: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new team service.
    #[must_use]
    pub const fn new(teams: Arc<T>, tasks: Arc<K>, clock: Arc<C>, limits: ListLimits) -> Self {
        Self {
            teams,
            tasks,
            clock,
            limits,
        }
    }

    /// Creates a team.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::Domain`] when the name or description is
    /// invalid and [`TeamServiceError::TeamRepository`] when persistence
    /// fails.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreateTeamRequest,
    ) -> TeamServiceResult<Team> {
        let CreateTeamRequest { name, description } = request;
        let team = Team::new(
            TeamName::new(name)?,
            TeamDescription::new(description)?,
            &*self.clock,
        );
        self.teams.create(ctx, &team).await?;
        Ok(team)
    }

    /// Retrieves a team and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamRepository`] when the team does not
    /// exist and [`TeamServiceError::TaskRepository`] when the task lookup
    /// fails.
    pub async fn retrieve_with_tasks(
        &self,
        ctx: &RequestContext,
        id: TeamId,
    ) -> TeamServiceResult<TeamWithTasks> {
        let team = self.teams.retrieve(ctx, id).await?;
        let tasks = self.tasks.list_by_team(ctx, id).await?;
        Ok(TeamWithTasks { team, tasks })
    }

    /// Lists teams newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TeamServiceError::TeamRepository`] when the query fails.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: u32,
        limit: Option<u32>,
    ) -> TeamServiceResult<ListResult<Team>> {
        let request = self.limits.page_request(page, limit);
        Ok(self.teams.list_paginated(ctx, request).await?)
    }

    /// Associates a task with a team.
    ///
    /// Re-associating a task with the team it already belongs to succeeds.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the team or task does not exist and
    /// [`TeamServiceError::TaskAssignedToAnotherTeam`] when the task belongs
    /// to a different team.
    pub async fn associate_task(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        task_id: TaskId,
    ) -> TeamServiceResult<Task> {
        let mut task = self.load_team_and_task(ctx, team_id, task_id).await?;
        if let Some(current_team) = task.team_id().filter(|current| *current != team_id) {
            return Err(TeamServiceError::TaskAssignedToAnotherTeam {
                task_id,
                current_team,
            });
        }

        task.assign_team(team_id, &*self.clock);
        self.tasks.update(ctx, task_id, &task).await?;
        Ok(task)
    }

    /// Removes a task from a team.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the team or task does not exist and
    /// [`TeamServiceError::TaskNotInTeam`] when the task does not belong to
    /// the team.
    pub async fn disassociate_task(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        task_id: TaskId,
    ) -> TeamServiceResult<Task> {
        let mut task = self.load_team_and_task(ctx, team_id, task_id).await?;
        if task.team_id() != Some(team_id) {
            return Err(TeamServiceError::TaskNotInTeam { task_id, team_id });
        }

        task.clear_team(&*self.clock);
        self.tasks.update(ctx, task_id, &task).await?;
        Ok(task)
    }

    async fn load_team_and_task(
        &self,
        ctx: &RequestContext,
        team_id: TeamId,
        task_id: TaskId,
    ) -> TeamServiceResult<Task> {
        self.teams.retrieve(ctx, team_id).await?;
        Ok(self.tasks.retrieve(ctx, task_id).await?)
    }
}
