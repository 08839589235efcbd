//! Resource lifecycle and repository composition.
//!
//! [`Resources::open`] creates the connection pool and, when enabled, the
//! cache client. Everything else borrows them through the constructors
//! below. Resources are released by [`Resources::close`] or on drop.

use crate::cache::{CacheStore, RedisCacheStore, redact_url};
use crate::config::{AppConfig, CacheConfig};
use crate::db::{self, DbError, PgPool};
use crate::task::{
    adapters::{cached::CachedTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
    services::TaskService,
};
use crate::team::{
    adapters::postgres::PostgresTeamRepository, ports::TeamRepository, services::TeamService,
};
use mockable::DefaultClock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while opening shared resources.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The relational store could not be reached.
    #[error("failed to open database pool: {0}")]
    Database(#[from] DbError),
}

/// Task service wired to the composed repository.
pub type AppTaskService = TaskService<dyn TaskRepository, DefaultClock>;

/// Team service wired to the composed repositories.
pub type AppTeamService = TeamService<dyn TeamRepository, dyn TaskRepository, DefaultClock>;

/// Wraps `inner` in the list cache when a cache store is available.
///
/// Without a cache the raw repository is returned, so callers see the same
/// port either way.
#[must_use]
pub fn compose_task_repository<R>(
    inner: R,
    cache: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
) -> Arc<dyn TaskRepository>
where
    R: TaskRepository + 'static,
{
    if let Some(store) = cache {
        return Arc::new(CachedTaskRepository::new(inner, store, ttl));
    }
    Arc::new(inner)
}

/// Connects to the configured cache, or returns `None` when caching is
/// disabled or the server does not answer.
pub async fn open_cache(config: &CacheConfig) -> Option<Arc<dyn CacheStore>> {
    if !config.enabled {
        info!("task list cache disabled");
        return None;
    }

    let endpoint = config.endpoint();
    let store = match RedisCacheStore::connect(config.connection_info(), config.connect_timeout())
        .await
    {
        Ok(store) => store,
        Err(err) => {
            warn!(
                endpoint = %endpoint,
                error = %err,
                "cache unavailable, continuing without task list cache"
            );
            return None;
        }
    };

    let probe = tokio::time::timeout(config.connect_timeout(), store.health_check()).await;
    match probe {
        Ok(Ok(())) => {
            info!(
                endpoint = %endpoint,
                ttl = ?config.default_ttl(),
                "task list cache enabled"
            );
            Some(Arc::new(store))
        }
        Ok(Err(err)) => {
            warn!(
                endpoint = %endpoint,
                error = %err,
                "cache health check failed, continuing without task list cache"
            );
            None
        }
        Err(_) => {
            warn!(
                endpoint = %endpoint,
                "cache health check timed out, continuing without task list cache"
            );
            None
        }
    }
}

/// Shared resources opened once per process.
pub struct Resources {
    pool: PgPool,
    cache: Option<Arc<dyn CacheStore>>,
    config: AppConfig,
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("pool", &self.pool.state())
            .field("cache", &self.cache.as_ref().map(|store| store.provider_name()))
            .field("config", &self.config)
            .finish()
    }
}

impl Resources {
    /// Opens the connection pool and the optional cache.
    ///
    /// A cache that cannot be reached is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Database`] when the pool cannot be built.
    pub async fn open(config: AppConfig) -> Result<Self, StartupError> {
        let pool = db::connect(&config.database.url, config.database.max_connections).await?;
        info!(
            url = %redact_url(&config.database.url),
            max_connections = config.database.max_connections,
            "database pool opened"
        );
        let cache = open_cache(&config.cache).await;
        Ok(Self::from_parts(pool, cache, config))
    }

    /// Assembles resources from already-open parts.
    #[must_use]
    pub const fn from_parts(
        pool: PgPool,
        cache: Option<Arc<dyn CacheStore>>,
        config: AppConfig,
    ) -> Self {
        Self {
            pool,
            cache,
            config,
        }
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the cache store, if caching is active.
    #[must_use]
    pub fn cache(&self) -> Option<Arc<dyn CacheStore>> {
        self.cache.clone()
    }

    /// Returns the configuration the resources were opened with.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the task repository, wrapped in the list cache when active.
    #[must_use]
    pub fn task_repository(&self) -> Arc<dyn TaskRepository> {
        compose_task_repository(
            PostgresTaskRepository::new(self.pool.clone()),
            self.cache(),
            self.config.cache.default_ttl(),
        )
    }

    /// Returns the team repository.
    #[must_use]
    pub fn team_repository(&self) -> Arc<dyn TeamRepository> {
        Arc::new(PostgresTeamRepository::new(self.pool.clone()))
    }

    /// Builds the task service.
    #[must_use]
    pub fn task_service(&self) -> AppTaskService {
        TaskService::new(
            self.task_repository(),
            Arc::new(DefaultClock),
            self.config.task.limits(),
        )
    }

    /// Builds the team service over the same task repository composition.
    #[must_use]
    pub fn team_service(&self) -> AppTeamService {
        TeamService::new(
            self.team_repository(),
            self.task_repository(),
            Arc::new(DefaultClock),
            self.config.team.limits(),
        )
    }

    /// Releases the pool and cache client.
    pub fn close(self) {
        info!("closing resources");
        drop(self);
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        let state = self.pool.state();
        info!(
            connections = state.connections,
            idle = state.idle_connections,
            cache = self.cache.is_some(),
            "resources released"
        );
    }
}
