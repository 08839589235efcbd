//! In-memory adapters for team persistence.

mod team;

pub use team::InMemoryTeamRepository;
