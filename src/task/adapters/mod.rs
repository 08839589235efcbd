//! Adapter implementations of the task ports.
//!
//! - [`memory`]: thread-safe in-memory repository
//! - [`postgres`]: Diesel-backed `PostgreSQL` repository
//! - [`cached`]: cache-aside decorator over any other repository

pub mod cached;
pub mod memory;
pub mod postgres;
