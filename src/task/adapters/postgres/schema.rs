//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned row identifier, used as the ordering tiebreak.
        id -> Int8,
        /// External task identifier.
        uuid -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Task status.
        #[max_length = 20]
        status -> Varchar,
        /// Owning team, if any.
        team_id -> Nullable<Uuid>,
        /// When work started.
        started_at -> Nullable<Timestamptz>,
        /// When the task reached a terminal status.
        finished_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker.
        deleted_at -> Nullable<Timestamptz>,
    }
}
