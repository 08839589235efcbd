//! Application configuration.
//!
//! Configuration is read from a TOML file. `${VAR}` and `${VAR:-default}`
//! placeholders are expanded from the environment before parsing, so
//! secrets can stay out of the file:
//!
//! ```toml
//! [database]
//! url = "${DATABASE_URL:-postgres://localhost/taskmanager}"
//!
//! [cache]
//! enabled = true
//! host = "${REDIS_HOST:-localhost}"
//! default_ttl_seconds = 300
//! ```

mod loader;

pub use loader::{ConfigError, expand_placeholders};

use crate::cache::redact_url;
use crate::pagination::ListLimits;
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Cache entry lifetime used when none is configured.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Relational store settings.
    pub database: DatabaseConfig,
    /// List cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Task listing limits.
    #[serde(default)]
    pub task: ListConfig,
    /// Team listing limits.
    #[serde(default)]
    pub team: ListConfig,
}

/// Relational store settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_max_connections() -> u32 {
    10
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// List cache settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether task listings are cached.
    pub enabled: bool,
    /// Redis host.
    pub host: String,
    /// Redis port.
    pub port: u16,
    /// Redis password, if any.
    pub password: Option<String>,
    /// Redis logical database.
    pub db: u8,
    /// Entry lifetime in seconds. Unset or zero selects 300 seconds.
    pub default_ttl_seconds: Option<u64>,
    /// How long startup waits for Redis before running without the cache.
    pub connect_timeout_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "localhost".to_owned(),
            port: 6379,
            password: None,
            db: 0,
            default_ttl_seconds: None,
            connect_timeout_seconds: 5,
        }
    }
}

impl CacheConfig {
    /// Returns the Redis connection target.
    ///
    /// The password is carried as a field rather than embedded in a URL, so
    /// reserved characters need no escaping.
    #[must_use]
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: i64::from(self.db),
                password: self.password.clone().filter(|secret| !secret.is_empty()),
                ..RedisConnectionInfo::default()
            },
        }
    }

    /// Returns the server address as a URL without credentials, for logs.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    /// Returns the cache entry lifetime.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl_seconds
            .filter(|seconds| *seconds > 0)
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs)
    }

    /// Returns the startup connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("db", &self.db)
            .field("default_ttl_seconds", &self.default_ttl_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridable through `RUST_LOG`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Page size limits for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Page size used when a request gives none.
    pub list_default_limit: u32,
    /// Largest page size a request may ask for.
    pub list_max_limit: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            list_default_limit: 10,
            list_max_limit: 100,
        }
    }
}

impl ListConfig {
    /// Returns the limits as used by the services.
    #[must_use]
    pub const fn limits(&self) -> ListLimits {
        ListLimits::new(self.list_default_limit, self.list_max_limit)
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if self.list_default_limit == 0 {
            return Err(ConfigError::Invalid(format!(
                "{section}.list_default_limit must be greater than zero"
            )));
        }
        if self.list_max_limit == 0 {
            return Err(ConfigError::Invalid(format!(
                "{section}.list_max_limit must be greater than zero"
            )));
        }
        if self.list_default_limit > self.list_max_limit {
            return Err(ConfigError::Invalid(format!(
                "{section}.list_default_limit must not exceed {section}.list_max_limit"
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Checks values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is required".to_owned()));
        }
        if self.cache.enabled {
            if self.cache.host.trim().is_empty() {
                return Err(ConfigError::Invalid("cache.host is required".to_owned()));
            }
            if self.cache.port == 0 {
                return Err(ConfigError::Invalid(
                    "cache.port must be greater than zero".to_owned(),
                ));
            }
        }
        self.task.validate("task")?;
        self.team.validate("team")
    }
}
