//! User repository
//!
//! All writes run inside a scoped unit of work: acquire, execute, commit.
//! Any error before the commit rolls the transaction back.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::db::Db;
use crate::models::{EmailAddress, FullName, Username};

use super::{translate, DbError};

/// User record from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a user
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub full_name: FullName,
    pub password_hash: String,
}

/// Partial update: `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub full_name: Option<FullName>,
    pub is_active: Option<bool>,
}

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, \
                            is_active, is_verified, created_at, updated_at";

/// User repository
pub struct UserRepo<'a> {
    db: &'a Db,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a user. Timestamps are assigned here; `created_at` and
    /// `updated_at` start equal.
    ///
    /// Duplicate username or email surfaces as [`DbError::Conflict`].
    pub async fn create(&self, new: NewUser) -> Result<UserRecord, DbError> {
        let now = Utc::now();
        let mut scope = self.db.acquire_scope().await?;

        let user: UserRecord = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (username, email, full_name, password_hash,
                               is_active, is_verified, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, 0, ?5, ?5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.username.as_str())
        .bind(new.email.as_str())
        .bind(new.full_name.as_str())
        .bind(&new.password_hash)
        .bind(now)
        .fetch_one(&mut *scope)
        .await
        .map_err(translate)?;

        scope.commit().await?;
        Ok(user)
    }

    /// Fetch a single user by id.
    pub async fn fetch(&self, id: i64) -> Result<UserRecord, DbError> {
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(DbError::NotFound {
                resource: "user",
                id,
            })
    }

    /// List all users, oldest first.
    pub async fn list(&self) -> Result<Vec<UserRecord>, DbError> {
        let users = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.db.pool())
            .await?;
        Ok(users)
    }

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// `COALESCE` keeps columns whose patch field is `None`; a present
    /// value always overwrites, including `false`.
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord, DbError> {
        let now = Utc::now();
        let mut scope = self.db.acquire_scope().await?;

        let user: UserRecord = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                username = COALESCE(?1, username),
                email = COALESCE(?2, email),
                full_name = COALESCE(?3, full_name),
                is_active = COALESCE(?4, is_active),
                updated_at = ?5
            WHERE id = ?6
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(patch.username.as_ref().map(Username::as_str))
        .bind(patch.email.as_ref().map(EmailAddress::as_str))
        .bind(patch.full_name.as_ref().map(FullName::as_str))
        .bind(patch.is_active)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *scope)
        .await
        .map_err(translate)?
        .ok_or(DbError::NotFound {
            resource: "user",
            id,
        })?;

        scope.commit().await?;
        Ok(user)
    }

    /// Delete a user. The foreign key cascades, so the user's posts are
    /// removed in the same operation.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut scope = self.db.acquire_scope().await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&mut *scope)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id,
            });
        }

        scope.commit().await?;
        Ok(())
    }
}
