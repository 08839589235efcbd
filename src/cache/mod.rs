//! Key/value cache stores used by the cache-aside list layer.
//!
//! The [`CacheStore`] port works on string values so that it stays object
//! safe; [`json`] layers JSON serialization and request deadlines on top.
//!
//! # Available Stores
//!
//! - [`RedisCacheStore`]: Redis-backed store using a multiplexed, reconnecting
//!   connection manager
//! - [`InMemoryCacheStore`]: Process-local store with TTL expiry, used in
//!   tests and single-process runs

mod error;
pub mod json;
mod memory;
mod redis_store;
mod store;

pub use error::{CacheError, CacheResult};
pub use memory::InMemoryCacheStore;
pub(crate) use redis_store::redact_url;
pub use redis_store::RedisCacheStore;
pub use store::{CacheStore, SCAN_BATCH_SIZE};

#[cfg(test)]
pub(crate) use store::MockCacheStore;
