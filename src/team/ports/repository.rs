//! Repository port for team persistence.

use crate::context::{DeadlineExceeded, RequestContext};
use crate::pagination::{ListResult, PageRequest};
use crate::team::domain::{Team, TeamId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for team repository operations.
pub type TeamRepositoryResult<T> = Result<T, TeamRepositoryError>;

/// Team persistence contract.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Stores a new team.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::DuplicateTeam`] when the identifier
    /// already exists.
    async fn create(&self, ctx: &RequestContext, team: &Team) -> TeamRepositoryResult<()>;

    /// Loads a team by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TeamRepositoryError::NotFound`] when the team does not exist.
    async fn retrieve(&self, ctx: &RequestContext, id: TeamId) -> TeamRepositoryResult<Team>;

    /// Lists teams newest first.
    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> TeamRepositoryResult<ListResult<Team>>;
}

/// Errors returned by team repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TeamRepositoryError {
    /// The team was not found.
    #[error("team not found: {0}")]
    NotFound(TeamId),

    /// A team with the same identifier already exists.
    #[error("duplicate team identifier: {0}")]
    DuplicateTeam(TeamId),

    /// The request deadline passed before the store answered.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TeamRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<DeadlineExceeded> for TeamRepositoryError {
    fn from(_: DeadlineExceeded) -> Self {
        Self::DeadlineExceeded
    }
}

#[async_trait]
impl<T> TeamRepository for Arc<T>
where
    T: TeamRepository + ?Sized,
{
    async fn create(&self, ctx: &RequestContext, team: &Team) -> TeamRepositoryResult<()> {
        (**self).create(ctx, team).await
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TeamId) -> TeamRepositoryResult<Team> {
        (**self).retrieve(ctx, id).await
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> TeamRepositoryResult<ListResult<Team>> {
        (**self).list_paginated(ctx, page).await
    }
}
