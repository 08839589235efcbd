//! Cache-aside decorator for the task repository.
//!
//! [`CachedTaskRepository`] wraps any [`TaskRepository`](crate::task::ports::TaskRepository)
//! and serves paginated listings from a [`CacheStore`](crate::cache::CacheStore).
//! Every successful mutation drops the whole list key space under
//! [`keys::LIST_KEY_PREFIX`]; cache failures never fail a request.

pub mod keys;
mod repository;

pub use repository::CachedTaskRepository;
