//! Error types for userstore-core
//!
//! Absence is not an error: lookups return `Option`. The variants here are
//! the failures a caller may need to tell apart.

use sqlx::error::DatabaseError;
use thiserror::Error;

use crate::db::schema::USER_ID_ACTIVE_INDEX;
use crate::models::{UserKey, ValidationError};

/// Result type alias for repository operations
pub type Result<T> = std::result::Result<T, UserRepoError>;

/// Repository error type
#[derive(Debug, Error)]
pub enum UserRepoError {
    /// Another active user already holds this natural id
    #[error("duplicate user id '{id}'")]
    DuplicateId { id: String },

    /// Raised only by the `get_*` helpers; `find_*` returns `None` instead
    #[error("user not found: {0}")]
    NotFound(UserKey),

    /// Update intent had no field to write
    #[error("update has no fields to set")]
    EmptyUpdate,

    /// Write intent failed validation
    #[error("invalid user data: {0}")]
    Invalid(#[from] ValidationError),

    /// Connection, pool, or any other storage failure, passed through unchanged
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn is_active_id_conflict(err: &dyn DatabaseError) -> bool {
    err.is_unique_violation() && err.constraint() == Some(USER_ID_ACTIVE_INDEX)
}

impl UserRepoError {
    /// Map a failed INSERT/UPDATE, turning a violation of the active-id
    /// index into `DuplicateId`.
    ///
    /// `id` is the natural id the statement tried to write. Unique
    /// violations on any other constraint pass through as `Database`.
    pub(crate) fn from_write(err: sqlx::Error, id: Option<&str>) -> Self {
        match (err, id) {
            (sqlx::Error::Database(db_err), Some(id)) if is_active_id_conflict(&*db_err) => {
                Self::DuplicateId { id: id.to_owned() }
            }
            (err, _) => Self::Database(err),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UserRepoError::DuplicateId { id: "alice".into() };
        assert_eq!(err.to_string(), "duplicate user id 'alice'");

        let err = UserRepoError::NotFound(UserKey::Idx(3));
        assert_eq!(err.to_string(), "user not found: idx 3");

        let err: UserRepoError = ValidationError::Empty { field: "pw" }.into();
        assert_eq!(err.to_string(), "invalid user data: pw cannot be empty");
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = UserRepoError::from_write(sqlx::Error::PoolTimedOut, Some("alice"));
        assert!(matches!(err, UserRepoError::Database(sqlx::Error::PoolTimedOut)));
        assert!(!err.is_duplicate());
    }

    #[test]
    fn predicates() {
        assert!(UserRepoError::DuplicateId { id: "a".into() }.is_duplicate());
        assert!(UserRepoError::NotFound(UserKey::Id("a".into())).is_not_found());
        assert!(!UserRepoError::EmptyUpdate.is_not_found());
    }
}
