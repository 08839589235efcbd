//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Diesel is synchronous, so every query is offloaded to Tokio's blocking
//! pool. Both the pool checkout and the transaction are bounded by the request
//! deadline: the server abandons statements the caller has stopped waiting
//! for, and nothing is committed once the deadline has passed.

use crate::context::{DeadlineExceeded, RequestContext};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by the task and team adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Schema applied by [`apply_schema`].
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-01-20-000000_create_teams_and_tasks/up.sql");

/// Infrastructure failures outside of query execution.
#[derive(Debug, Error)]
pub enum DbError {
    /// No connection could be obtained from the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// Pool construction opens connections eagerly, so it runs on the blocking
/// pool.
///
/// # Errors
///
/// Returns [`DbError::Pool`] when the initial connections cannot be opened.
pub async fn connect(database_url: &str, max_size: u32) -> Result<PgPool, DbError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder().max_size(max_size.max(1)).build(manager)
    })
    .await??;
    Ok(pool)
}

/// Creates the `teams` and `tasks` tables if they do not exist yet.
///
/// # Errors
///
/// Returns the Diesel error raised by the server.
pub fn apply_schema(connection: &mut PgConnection) -> QueryResult<()> {
    connection.batch_execute(SCHEMA_SQL)
}

/// Runs `operation` in a transaction on the blocking pool, bounded by the
/// request deadline.
///
/// When the context carries a deadline, the pool checkout waits no longer
/// than the remaining budget and the transaction starts with
/// `SET LOCAL statement_timeout` set to what is left after the checkout. Work
/// that finishes after the deadline is rolled back rather than committed, and
/// the caller stops waiting once the deadline passes.
pub(crate) async fn run_bounded<F, T, E>(
    pool: &PgPool,
    ctx: &RequestContext,
    operation: F,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<DbError> + From<DieselError> + From<DeadlineExceeded> + Send + 'static,
{
    ctx.check()?;
    let pool = pool.clone();
    let bounds = *ctx;

    let handle = tokio::task::spawn_blocking(move || {
        let mut pooled = checkout::<E>(&pool, &bounds)?;
        let connection: &mut PgConnection = &mut pooled;
        connection.transaction::<T, E, _>(|tx| {
            if let Some(left) = bounds.remaining() {
                if left.is_zero() {
                    return Err(DeadlineExceeded.into());
                }
                set_statement_timeout(tx, left)?;
            }
            let output = operation(tx)?;
            bounds.check()?;
            Ok(output)
        })
    });

    ctx.run(handle).await?.map_err(DbError::from)?
}

/// Takes a connection from `pool`, waiting at most until the deadline.
fn checkout<E>(pool: &PgPool, ctx: &RequestContext) -> Result<PgPooledConnection, E>
where
    E: From<DbError> + From<DeadlineExceeded>,
{
    let Some(wait) = ctx.remaining() else {
        return pool.get().map_err(|err| E::from(DbError::from(err)));
    };
    if wait.is_zero() {
        return Err(E::from(DeadlineExceeded));
    }
    pool.get_timeout(wait).map_err(|err| {
        if ctx.is_expired() {
            E::from(DeadlineExceeded)
        } else {
            E::from(DbError::from(err))
        }
    })
}

fn set_statement_timeout(connection: &mut PgConnection, budget: Duration) -> QueryResult<()> {
    let millis = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX).max(1);
    diesel::sql_query(format!("SET LOCAL statement_timeout = {millis}"))
        .execute(connection)
        .map(|_| ())
}

/// Returns `true` when the server cancelled the statement because its
/// `statement_timeout` elapsed.
pub(crate) fn is_statement_timeout(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info)
            if info.message().contains("statement timeout")
    )
}
