//! Scoped unit of work
//!
//! A `Scope` is a transaction bound to one logical request. Writes inside
//! the scope become visible only after `commit()`; if the scope is dropped
//! without committing (an error propagated, an early return), the
//! transaction rolls back and the connection goes back to the pool. There
//! is no exit path that leaks a connection.

use std::ops::{Deref, DerefMut};

use sqlx::sqlite::SqliteConnection;
use sqlx::{Sqlite, Transaction};

/// Transaction-backed unit of work.
///
/// Dereferences to the underlying connection so it can be used anywhere
/// an executor is expected:
///
/// ```ignore
/// let mut scope = db.acquire_scope().await?;
/// sqlx::query("DELETE FROM posts WHERE id = ?1")
///     .bind(id)
///     .execute(&mut *scope)
///     .await?;
/// scope.commit().await?;
/// ```
pub struct Scope {
    tx: Transaction<'static, Sqlite>,
}

impl Scope {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    /// Commit all writes made within the scope.
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    /// Explicitly roll back. Dropping the scope has the same effect.
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

impl Deref for Scope {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for Scope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}
