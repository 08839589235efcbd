//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by task services and
//! by the cache-aside decorator.

pub mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
