//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use mockable::DefaultClock;
use taskmanager::db::{PgPool, apply_schema};
use taskmanager::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Task, TaskDescription, TaskTitle},
};
use taskmanager::team::{
    adapters::postgres::PostgresTeamRepository,
    domain::{Team, TeamDescription, TeamName},
};
use uuid::Uuid;

/// Error type used by fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pins every pooled connection to one schema.
#[derive(Debug)]
struct SearchPath {
    schema: String,
}

impl CustomizeConnection<PgConnection, r2d2::Error> for SearchPath {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), r2d2::Error> {
        connection
            .batch_execute(&format!("SET search_path TO {}", self.schema))
            .map_err(r2d2::Error::QueryError)
    }
}

/// A throwaway schema with both repositories bound to it.
pub struct TestDatabase {
    url: String,
    schema: String,
    /// Pool pinned to the schema.
    pub pool: PgPool,
    /// Task repository over the pool.
    pub tasks: PostgresTaskRepository,
    /// Team repository over the pool.
    pub teams: PostgresTeamRepository,
}

impl TestDatabase {
    /// Builds a second pool over the same schema holding a single connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub async fn single_connection_pool(&self) -> Result<PgPool, BoxError> {
        let url = self.url.clone();
        let schema = self.schema.clone();
        let pool = tokio::task::spawn_blocking(move || {
            Pool::builder()
                .max_size(1)
                .connection_customizer(Box::new(SearchPath { schema }))
                .build(ConnectionManager::<PgConnection>::new(url))
        })
        .await??;
        Ok(pool)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut connection) = PgConnection::establish(&self.url) {
            let statement = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
            if let Err(err) = connection.batch_execute(&statement) {
                tracing::warn!(schema = %self.schema, error = %err, "failed to drop test schema");
            }
        }
    }
}

/// Creates an isolated schema, or returns `None` when `DATABASE_URL` is unset.
///
/// # Errors
///
/// Returns an error if the server is configured but unreachable or the
/// schema cannot be applied.
pub async fn test_database() -> Result<Option<TestDatabase>, BoxError> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        tracing::warn!("DATABASE_URL not set, skipping PostgreSQL test");
        return Ok(None);
    };
    let schema = format!("test_{}", Uuid::new_v4().simple());

    let setup_url = url.clone();
    let setup_schema = schema.clone();
    let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, BoxError> {
        let mut connection = PgConnection::establish(&setup_url)?;
        connection.batch_execute(&format!("CREATE SCHEMA {setup_schema}"))?;
        connection.batch_execute(&format!("SET search_path TO {setup_schema}"))?;
        apply_schema(&mut connection)?;

        let pool = Pool::builder()
            .max_size(2)
            .connection_customizer(Box::new(SearchPath {
                schema: setup_schema,
            }))
            .build(ConnectionManager::<PgConnection>::new(setup_url))?;
        Ok(pool)
    })
    .await??;

    Ok(Some(TestDatabase {
        url,
        schema,
        tasks: PostgresTaskRepository::new(pool.clone()),
        teams: PostgresTeamRepository::new(pool.clone()),
        pool,
    }))
}

/// Builds an unsaved task.
///
/// # Errors
///
/// Returns an error if `title` is invalid.
pub fn new_task(title: &str) -> Result<Task, BoxError> {
    Ok(Task::new(
        TaskTitle::new(title)?,
        TaskDescription::new("postgres fixture")?,
        &DefaultClock,
    ))
}

/// Builds an unsaved team.
///
/// # Errors
///
/// Returns an error if `name` is invalid.
pub fn new_team(name: &str) -> Result<Team, BoxError> {
    Ok(Team::new(
        TeamName::new(name)?,
        TeamDescription::new("postgres fixture")?,
        &DefaultClock,
    ))
}
