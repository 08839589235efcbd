//! JSON codec and deadline handling on top of a [`CacheStore`].
//!
//! Every helper runs the underlying store call under the request deadline
//! carried by the [`RequestContext`] and reports expiry as
//! [`CacheError::Timeout`].

use super::{CacheError, CacheResult, CacheStore};
use crate::context::RequestContext;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

async fn bounded<F, T>(ctx: &RequestContext, operation: &'static str, future: F) -> CacheResult<T>
where
    F: Future<Output = CacheResult<T>>,
{
    ctx.run(future).await.map_err(|_| {
        CacheError::Timeout(format!("{operation} did not complete before the deadline"))
    })?
}

/// Reads and decodes a JSON value.
///
/// # Errors
///
/// Returns [`CacheError::Serialization`] when the stored value does not
/// decode as `T`, [`CacheError::Timeout`] when the deadline passes, and any
/// error raised by the store.
pub async fn get<T, S>(store: &S, ctx: &RequestContext, key: &str) -> CacheResult<Option<T>>
where
    T: DeserializeOwned,
    S: CacheStore + ?Sized,
{
    let Some(raw) = bounded(ctx, "cache get", store.get(key)).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| CacheError::Serialization(format!("failed to decode {key}: {err}")))
}

/// Encodes and stores a JSON value with the given TTL.
///
/// # Errors
///
/// Returns [`CacheError::Serialization`] when `value` cannot be encoded,
/// [`CacheError::Timeout`] when the deadline passes, and any error raised by
/// the store.
pub async fn set<T, S>(
    store: &S,
    ctx: &RequestContext,
    key: &str,
    value: &T,
    ttl: Duration,
) -> CacheResult<()>
where
    T: Serialize + ?Sized,
    S: CacheStore + ?Sized,
{
    let encoded = serde_json::to_string(value)
        .map_err(|err| CacheError::Serialization(format!("failed to encode {key}: {err}")))?;
    bounded(ctx, "cache set", store.set(key, &encoded, ttl)).await
}

/// Deletes every key under `prefix` within the request deadline.
///
/// # Errors
///
/// Returns [`CacheError::Timeout`] when the deadline passes, and any error
/// raised by the store.
pub async fn delete_by_prefix<S>(store: &S, ctx: &RequestContext, prefix: &str) -> CacheResult<u64>
where
    S: CacheStore + ?Sized,
{
    bounded(ctx, "cache prefix delete", store.delete_by_prefix(prefix)).await
}
