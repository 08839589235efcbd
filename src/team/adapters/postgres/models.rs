//! Diesel row models for team persistence.

use super::schema::teams;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for team records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    /// Store-assigned row identifier.
    pub id: i64,
    /// External team identifier.
    pub uuid: uuid::Uuid,
    /// Team name.
    pub name: String,
    /// Team description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for team records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    /// External team identifier.
    pub uuid: uuid::Uuid,
    /// Team name.
    pub name: String,
    /// Team description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
