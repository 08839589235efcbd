//! `PostgreSQL` adapters for team persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresTeamRepository;
