//! Diesel schema for team persistence.

diesel::table! {
    /// Team records.
    teams (id) {
        /// Store-assigned row identifier.
        id -> Int8,
        /// External team identifier.
        uuid -> Uuid,
        /// Team name.
        #[max_length = 255]
        name -> Varchar,
        /// Team description.
        description -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete marker.
        deleted_at -> Nullable<Timestamptz>,
    }
}
