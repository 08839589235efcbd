//! Taskmanager: task and team persistence with a cache-aside list layer.
//!
//! This crate provides the persistence and service layers of a task/team
//! management backend. Tasks and teams live in `PostgreSQL`; paginated task
//! listings can be served from a Redis-backed cache that is invalidated as a
//! whole whenever a task mutation succeeds.
//!
//! # Architecture
//!
//! Taskmanager follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, cache, memory)
//!
//! The cache-aside layer is itself an adapter of the task port that wraps
//! another adapter, so callers never know whether caching is enabled.
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, status transitions, and the cached list adapter
//! - [`team`]: Teams and task association
//! - [`cache`]: Key/value cache stores (Redis and in-memory)
//! - [`context`]: Request-scoped deadlines passed through every call
//! - [`config`]: TOML configuration with environment expansion
//! - [`runtime`]: Startup wiring and resource lifecycle

pub mod cache;
pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod pagination;
pub mod runtime;
pub mod task;
pub mod team;
