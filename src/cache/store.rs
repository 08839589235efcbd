//! Cache store port.

use super::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Number of keys requested per scan round-trip by prefix deletion.
pub const SCAN_BATCH_SIZE: usize = 100;

/// Generic key/value cache contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Reads a value.
    ///
    /// Returns `Ok(None)` when the key is absent; absence is never an error.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Deletes the given keys and returns how many existed.
    ///
    /// An empty slice is a no-op.
    async fn delete(&self, keys: &[String]) -> CacheResult<u64>;

    /// Deletes every key starting with `prefix` and returns how many were
    /// removed.
    ///
    /// Remote implementations page through matching keys in batches of
    /// [`SCAN_BATCH_SIZE`] rather than assuming the key space fits in one
    /// round-trip.
    async fn delete_by_prefix(&self, prefix: &str) -> CacheResult<u64>;

    /// Verifies that the backend answers.
    async fn health_check(&self) -> CacheResult<()>;

    /// Returns a short provider name for log output.
    fn provider_name(&self) -> &'static str;
}
