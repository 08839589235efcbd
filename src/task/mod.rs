//! Task management.
//!
//! Tasks carry a title, a description, a status that follows a fixed
//! lifecycle, and an optional owning team. Deletes are soft. Paginated
//! listings may be served through [`adapters::cached::CachedTaskRepository`],
//! which any other repository can be wrapped in.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
