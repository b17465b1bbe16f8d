//! Post repository
//!
//! Author linkage is enforced by the foreign key: inserting a post whose
//! `author_id` has no matching user fails at write time, before anything
//! is persisted. Traversal in both directions is an explicit query.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Row};

use crate::db::Db;
use crate::models::{PostContent, PostTitle};

use super::users::UserRecord;
use super::{translate, DbError};

/// Post record from the database
#[derive(Debug, Clone, FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a post
#[derive(Debug)]
pub struct NewPost {
    pub title: PostTitle,
    pub content: PostContent,
    pub is_published: bool,
    pub author_id: i64,
}

/// Partial update: `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct PostPatch {
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
    pub is_published: Option<bool>,
}

const POST_COLUMNS: &str =
    "id, title, content, is_published, author_id, created_at, updated_at";

/// Post repository
pub struct PostRepo<'a> {
    db: &'a Db,
}

impl<'a> PostRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert a post. A missing author surfaces as [`DbError::ForeignKey`]
    /// and nothing is persisted.
    pub async fn create(&self, new: NewPost) -> Result<PostRecord, DbError> {
        let now = Utc::now();
        let mut scope = self.db.acquire_scope().await?;

        let post: PostRecord = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (title, content, is_published, author_id,
                               created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(new.title.as_str())
        .bind(new.content.as_str())
        .bind(new.is_published)
        .bind(new.author_id)
        .bind(now)
        .fetch_one(&mut *scope)
        .await
        .map_err(translate)?;

        scope.commit().await?;
        Ok(post)
    }

    /// Fetch a single post by id.
    pub async fn fetch(&self, id: i64) -> Result<PostRecord, DbError> {
        sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(DbError::NotFound {
                resource: "post",
                id,
            })
    }

    /// List all posts, oldest first.
    pub async fn list(&self) -> Result<Vec<PostRecord>, DbError> {
        let posts = sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id"))
            .fetch_all(self.db.pool())
            .await?;
        Ok(posts)
    }

    /// All posts owned by one user, in creation order.
    ///
    /// This is the explicit form of the user→posts relationship: one query,
    /// no lazy loading.
    pub async fn find_by_owner(&self, author_id: i64) -> Result<Vec<PostRecord>, DbError> {
        let posts = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE author_id = ?1 ORDER BY created_at, id"
        ))
        .bind(author_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(posts)
    }

    /// Fetch a post together with its author in a single JOIN.
    pub async fn fetch_with_author(
        &self,
        id: i64,
    ) -> Result<(PostRecord, UserRecord), DbError> {
        let row = sqlx::query(
            r#"
            SELECT
                p.id, p.title, p.content, p.is_published, p.author_id,
                p.created_at, p.updated_at,
                u.id AS u_id, u.username AS u_username, u.email AS u_email,
                u.full_name AS u_full_name, u.password_hash AS u_password_hash,
                u.is_active AS u_is_active, u.is_verified AS u_is_verified,
                u.created_at AS u_created_at, u.updated_at AS u_updated_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(DbError::NotFound {
            resource: "post",
            id,
        })?;

        let post = PostRecord {
            id: row.get("id"),
            title: row.get("title"),
            content: row.get("content"),
            is_published: row.get("is_published"),
            author_id: row.get("author_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };
        let author = UserRecord {
            id: row.get("u_id"),
            username: row.get("u_username"),
            email: row.get("u_email"),
            full_name: row.get("u_full_name"),
            password_hash: row.get("u_password_hash"),
            is_active: row.get("u_is_active"),
            is_verified: row.get("u_is_verified"),
            created_at: row.get("u_created_at"),
            updated_at: row.get("u_updated_at"),
        };

        Ok((post, author))
    }

    /// Apply a partial update and refresh `updated_at`.
    pub async fn update(&self, id: i64, patch: PostPatch) -> Result<PostRecord, DbError> {
        let now = Utc::now();
        let mut scope = self.db.acquire_scope().await?;

        let post: PostRecord = sqlx::query_as(&format!(
            r#"
            UPDATE posts SET
                title = COALESCE(?1, title),
                content = COALESCE(?2, content),
                is_published = COALESCE(?3, is_published),
                updated_at = ?4
            WHERE id = ?5
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(patch.title.as_ref().map(PostTitle::as_str))
        .bind(patch.content.as_ref().map(PostContent::as_str))
        .bind(patch.is_published)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *scope)
        .await
        .map_err(translate)?
        .ok_or(DbError::NotFound {
            resource: "post",
            id,
        })?;

        scope.commit().await?;
        Ok(post)
    }

    /// Delete a post.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut scope = self.db.acquire_scope().await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&mut *scope)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "post",
                id,
            });
        }

        scope.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{NewUser, UserRepo};
    use crate::models::{EmailAddress, FullName, Username};

    async fn seed_author(db: &Db) -> UserRecord {
        UserRepo::new(db)
            .create(NewUser {
                username: Username::new("author").unwrap(),
                email: EmailAddress::new("author@example.com").unwrap(),
                full_name: FullName::new("The Author").unwrap(),
                password_hash: "$argon2id$stub".to_owned(),
            })
            .await
            .unwrap()
    }

    fn new_post(author_id: i64, title: &str) -> NewPost {
        NewPost {
            title: PostTitle::new(title).unwrap(),
            content: PostContent::new("long enough content").unwrap(),
            is_published: false,
            author_id,
        }
    }

    #[tokio::test]
    async fn create_assigns_defaults() {
        let db = Db::in_memory().await;
        let author = seed_author(&db).await;

        let post = PostRepo::new(&db)
            .create(new_post(author.id, "Hello world"))
            .await
            .unwrap();

        assert!(post.id > 0);
        assert!(!post.is_published);
        assert_eq!(post.author_id, author.id);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[tokio::test]
    async fn missing_author_is_foreign_key_error() {
        let db = Db::in_memory().await;

        let err = PostRepo::new(&db)
            .create(new_post(999, "Orphan post"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));

        // Nothing persisted
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn find_by_owner_returns_only_owned_in_order() {
        let db = Db::in_memory().await;
        let author = seed_author(&db).await;
        let other = UserRepo::new(&db)
            .create(NewUser {
                username: Username::new("other").unwrap(),
                email: EmailAddress::new("other@example.com").unwrap(),
                full_name: FullName::new("Other").unwrap(),
                password_hash: "$argon2id$stub".to_owned(),
            })
            .await
            .unwrap();

        let repo = PostRepo::new(&db);
        let first = repo.create(new_post(author.id, "First post")).await.unwrap();
        let second = repo
            .create(new_post(author.id, "Second post"))
            .await
            .unwrap();
        repo.create(new_post(other.id, "Not ours")).await.unwrap();

        let owned = repo.find_by_owner(author.id).await.unwrap();
        let ids: Vec<i64> = owned.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn find_by_owner_empty_for_postless_user() {
        let db = Db::in_memory().await;
        let author = seed_author(&db).await;

        let owned = PostRepo::new(&db).find_by_owner(author.id).await.unwrap();
        assert!(owned.is_empty());
    }

    #[tokio::test]
    async fn fetch_with_author_joins() {
        let db = Db::in_memory().await;
        let author = seed_author(&db).await;
        let post = PostRepo::new(&db)
            .create(new_post(author.id, "Joined post"))
            .await
            .unwrap();

        let (fetched, fetched_author) =
            PostRepo::new(&db).fetch_with_author(post.id).await.unwrap();

        assert_eq!(fetched.id, post.id);
        assert_eq!(fetched_author.id, author.id);
        assert_eq!(fetched_author.username, "author");
    }

    #[tokio::test]
    async fn partial_update_leaves_omitted_fields() {
        let db = Db::in_memory().await;
        let author = seed_author(&db).await;
        let repo = PostRepo::new(&db);
        let post = repo.create(new_post(author.id, "Before edit")).await.unwrap();

        let patch = PostPatch {
            is_published: Some(true),
            ..Default::default()
        };
        let updated = repo.update(post.id, patch).await.unwrap();

        assert!(updated.is_published);
        assert_eq!(updated.title, "Before edit");
        assert_eq!(updated.content, "long enough content");
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let db = Db::in_memory().await;
        let author = seed_author(&db).await;
        let repo = PostRepo::new(&db);
        let post = repo.create(new_post(author.id, "Ephemeral")).await.unwrap();

        repo.delete(post.id).await.unwrap();

        assert!(matches!(
            repo.fetch(post.id).await.unwrap_err(),
            DbError::NotFound { resource: "post", .. }
        ));
    }
}
