//! Cache error types.

use thiserror::Error;

/// Errors raised while talking to a cache store.
///
/// None of these are fatal to the caller: the cache-aside layer logs them and
/// falls back to the authoritative store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The cache backend could not be reached.
    #[error("cache connection error: {0}")]
    Connection(String),

    /// A value could not be serialized or deserialized.
    #[error("cache serialization error: {0}")]
    Serialization(String),

    /// The request deadline elapsed before the cache answered.
    #[error("cache operation timed out: {0}")]
    Timeout(String),

    /// The backend rejected or failed the command.
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
