//! Domain model for teams.

mod error;
mod ids;
mod team;

pub use error::TeamDomainError;
pub use ids::TeamId;
pub use team::{PersistedTeamData, Team, TeamDescription, TeamName};
