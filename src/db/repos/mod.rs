//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Rely on DB constraints, handle violations (no check-then-insert)
//! - Writes go through a scoped unit of work with explicit commit
//! - Relationship traversal is an explicit query (no lazy loading, no N+1)

pub mod posts;
pub mod users;

pub use posts::{NewPost, PostPatch, PostRecord, PostRepo};
pub use users::{NewUser, UserPatch, UserRecord, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} #{id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unknown reference: {0}")]
    ForeignKey(String),
}

/// Split constraint violations out of the generic sqlx error so callers can
/// tell client mistakes (duplicate username, missing author) from server
/// faults.
pub(crate) fn translate(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                return DbError::Conflict(db_err.message().to_owned());
            }
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                return DbError::ForeignKey(db_err.message().to_owned());
            }
            _ => {}
        }
    }
    DbError::Sqlx(err)
}
