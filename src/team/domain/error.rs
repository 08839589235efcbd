//! Error types for team domain validation.

use thiserror::Error;

/// Longest accepted team name, in characters.
pub(crate) const MAX_NAME_CHARS: usize = 255;

/// Errors returned while constructing domain team values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamDomainError {
    /// The name is empty after trimming.
    #[error("team name must not be empty")]
    EmptyName,

    /// The name exceeds the maximum length.
    #[error("team name must be at most {MAX_NAME_CHARS} characters, got {length}")]
    NameTooLong {
        /// Length of the rejected name in characters.
        length: usize,
    },

    /// The description is empty after trimming.
    #[error("team description must not be empty")]
    EmptyDescription,
}
