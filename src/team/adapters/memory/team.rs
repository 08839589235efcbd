//! In-memory repository for teams.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::context::RequestContext;
use crate::pagination::{ListResult, PageRequest};
use crate::team::{
    domain::{Team, TeamId},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};

/// Thread-safe in-memory team repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTeamRepository {
    state: Arc<RwLock<InMemoryTeamState>>,
}

#[derive(Debug, Default)]
struct InMemoryTeamState {
    teams: HashMap<TeamId, Team>,
    last_record_id: i64,
}

impl InMemoryTeamRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(message: String) -> TeamRepositoryError {
    TeamRepositoryError::persistence(std::io::Error::other(message))
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, ctx: &RequestContext, team: &Team) -> TeamRepositoryResult<()> {
        ctx.check()?;
        let mut state = self
            .state
            .write()
            .map_err(|err| lock_error(err.to_string()))?;
        if state.teams.contains_key(&team.id()) {
            return Err(TeamRepositoryError::DuplicateTeam(team.id()));
        }
        state.last_record_id += 1;
        let mut stored = team.clone();
        stored.set_record_id(state.last_record_id);
        state.teams.insert(team.id(), stored);
        Ok(())
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TeamId) -> TeamRepositoryResult<Team> {
        ctx.check()?;
        let state = self
            .state
            .read()
            .map_err(|err| lock_error(err.to_string()))?;
        state
            .teams
            .get(&id)
            .cloned()
            .ok_or(TeamRepositoryError::NotFound(id))
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> TeamRepositoryResult<ListResult<Team>> {
        ctx.check()?;
        let state = self
            .state
            .read()
            .map_err(|err| lock_error(err.to_string()))?;
        let mut teams: Vec<Team> = state.teams.values().cloned().collect();
        drop(state);
        teams.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.record_id().cmp(&a.record_id()))
        });

        let total = u64::try_from(teams.len()).map_err(TeamRepositoryError::persistence)?;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = teams.into_iter().skip(skip).take(take).collect();
        Ok(ListResult::new(items, page, total))
    }
}
