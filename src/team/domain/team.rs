//! Team aggregate and its validated fields.

use super::error::MAX_NAME_CHARS;
use super::{TeamDomainError, TeamId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Team name, trimmed, non-empty and at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamName(String);

impl TeamName {
    /// Creates a validated name.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyName`] or
    /// [`TeamDomainError::NameTooLong`].
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamDomainError::EmptyName);
        }
        let length = trimmed.chars().count();
        if length > MAX_NAME_CHARS {
            return Err(TeamDomainError::NameTooLong { length });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team description, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamDescription(String);

impl TeamDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TeamDomainError::EmptyDescription`] when the trimmed value
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, TeamDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TeamDomainError::EmptyDescription);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Team aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    record_id: Option<i64>,
    id: TeamId,
    name: TeamName,
    description: TeamDescription,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTeamData {
    /// Store-assigned row identifier.
    pub record_id: Option<i64>,
    /// Persisted external identifier.
    pub id: TeamId,
    /// Persisted name.
    pub name: TeamName,
    /// Persisted description.
    pub description: TeamDescription,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team.
    #[must_use]
    pub fn new(name: TeamName, description: TeamDescription, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            record_id: None,
            id: TeamId::new(),
            name,
            description,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a team from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTeamData) -> Self {
        Self {
            record_id: data.record_id,
            id: data.id,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the store-assigned row identifier, once persisted.
    #[must_use]
    pub const fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    /// Returns the external team identifier.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &TeamName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TeamDescription {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) const fn set_record_id(&mut self, record_id: i64) {
        self.record_id = Some(record_id);
    }
}
