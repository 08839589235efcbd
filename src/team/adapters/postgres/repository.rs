//! `PostgreSQL` repository implementation for team storage.

use super::{
    models::{NewTeamRow, TeamRow},
    schema::teams,
};
use crate::context::RequestContext;
use crate::db::{self, DbError, PgPool};
use crate::pagination::{ListResult, PageRequest};
use crate::team::{
    domain::{PersistedTeamData, Team, TeamDescription, TeamId, TeamName},
    ports::{TeamRepository, TeamRepositoryError, TeamRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed team repository.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<DieselError> for TeamRepositoryError {
    fn from(err: DieselError) -> Self {
        if db::is_statement_timeout(&err) {
            Self::DeadlineExceeded
        } else {
            Self::persistence(err)
        }
    }
}

impl From<DbError> for TeamRepositoryError {
    fn from(err: DbError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, ctx: &RequestContext, team: &Team) -> TeamRepositoryResult<()> {
        let team_id = team.id();
        let new_row = NewTeamRow {
            uuid: team_id.into_inner(),
            name: team.name().as_str().to_owned(),
            description: team.description().as_str().to_owned(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        };

        db::run_bounded(&self.pool, ctx, move |connection| {
            diesel::insert_into(teams::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TeamRepositoryError::DuplicateTeam(team_id)
                    }
                    other => TeamRepositoryError::from(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn retrieve(&self, ctx: &RequestContext, id: TeamId) -> TeamRepositoryResult<Team> {
        db::run_bounded(&self.pool, ctx, move |connection| {
            let row = teams::table
                .filter(teams::uuid.eq(id.into_inner()))
                .filter(teams::deleted_at.is_null())
                .select(TeamRow::as_select())
                .first::<TeamRow>(connection)
                .optional()?
                .ok_or(TeamRepositoryError::NotFound(id))?;
            row_to_team(row)
        })
        .await
    }

    async fn list_paginated(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> TeamRepositoryResult<ListResult<Team>> {
        let offset = i64::try_from(page.offset()).map_err(TeamRepositoryError::persistence)?;
        let limit = i64::from(page.limit());

        db::run_bounded(&self.pool, ctx, move |connection| {
            let total: i64 = teams::table
                .filter(teams::deleted_at.is_null())
                .count()
                .get_result(connection)?;
            let rows = teams::table
                .filter(teams::deleted_at.is_null())
                .order((teams::created_at.desc(), teams::id.desc()))
                .offset(offset)
                .limit(limit)
                .select(TeamRow::as_select())
                .load::<TeamRow>(connection)?;

            let items = rows
                .into_iter()
                .map(row_to_team)
                .collect::<TeamRepositoryResult<Vec<_>>>()?;
            let total_items = u64::try_from(total).map_err(TeamRepositoryError::persistence)?;
            Ok(ListResult::new(items, page, total_items))
        })
        .await
    }
}

fn row_to_team(row: TeamRow) -> TeamRepositoryResult<Team> {
    let TeamRow {
        id,
        uuid,
        name,
        description,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTeamData {
        record_id: Some(id),
        id: TeamId::from_uuid(uuid),
        name: TeamName::new(name).map_err(TeamRepositoryError::persistence)?,
        description: TeamDescription::new(description)
            .map_err(TeamRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Team::from_persisted(data))
}
