//! Post endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewPost, PostPatch, PostRecord, PostRepo};
use crate::http::error::ApiError;
use crate::http::routes::users::UserResponse;
use crate::http::server::AppState;
use crate::models::{PostContent, PostTitle};

/// Create post request
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
    pub author_id: i64,
}

/// Update post request - every field optional; absent fields are untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

/// Post response
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRecord> for PostResponse {
    fn from(p: PostRecord) -> Self {
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            is_published: p.is_published,
            author_id: p.author_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Post with its author (the many-to-one direction)
#[derive(Debug, Serialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: UserResponse,
}

/// POST /posts - create a post for an existing author
async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let title = PostTitle::new(&req.title)?;
    let content = PostContent::new(&req.content)?;

    let post = PostRepo::new(&state.db)
        .create(NewPost {
            title,
            content,
            is_published: req.is_published,
            author_id: req.author_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// GET /posts - list all posts
async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = PostRepo::new(&state.db).list().await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /posts/{id} - get a single post
async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostRepo::new(&state.db).fetch(id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// PATCH /posts/{id} - partial update
async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let patch = PostPatch {
        title: req.title.as_deref().map(PostTitle::new).transpose()?,
        content: req.content.as_deref().map(PostContent::new).transpose()?,
        is_published: req.is_published,
    };

    let post = PostRepo::new(&state.db).update(id, patch).await?;
    Ok(Json(PostResponse::from(post)))
}

/// DELETE /posts/{id} - delete a post
async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    PostRepo::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /posts/{id}/author - post together with its author, one JOIN
async fn get_post_author(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PostWithAuthor>, ApiError> {
    let (post, author) = PostRepo::new(&state.db).fetch_with_author(id).await?;

    Ok(Json(PostWithAuthor {
        post: PostResponse::from(post),
        author: UserResponse::from(author),
    }))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/posts/{id}/author", get(get_post_author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{NewUser, UserRepo};
    use crate::db::Db;
    use crate::models::{EmailAddress, FullName, Username};

    async fn state() -> Arc<AppState> {
        Arc::new(AppState {
            db: Db::in_memory().await,
        })
    }

    async fn seed_author(state: &AppState) -> i64 {
        UserRepo::new(&state.db)
            .create(NewUser {
                username: Username::new("author").unwrap(),
                email: EmailAddress::new("author@example.com").unwrap(),
                full_name: FullName::new("The Author").unwrap(),
                password_hash: "$argon2id$stub".to_owned(),
            })
            .await
            .unwrap()
            .id
    }

    fn new_post_req(author_id: i64) -> CreatePostRequest {
        CreatePostRequest {
            title: "My First Post".into(),
            content: "Hello from the test suite".into(),
            is_published: false,
            author_id,
        }
    }

    #[tokio::test]
    async fn create_post_defaults_unpublished() {
        let state = state().await;
        let author_id = seed_author(&state).await;

        let (status, Json(post)) = create_post(State(state), Json(new_post_req(author_id)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(!post.is_published);
        assert_eq!(post.author_id, author_id);
    }

    #[tokio::test]
    async fn create_post_for_missing_author_is_client_error() {
        let state = state().await;

        let err = create_post(State(state.clone()), Json(new_post_req(999)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownReference { .. }));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(state.db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn create_post_rejects_short_title() {
        let state = state().await;
        let author_id = seed_author(&state).await;
        let req = CreatePostRequest {
            title: "Hey".into(),
            ..new_post_req(author_id)
        };

        let err = create_post(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn update_only_publish_flag() {
        let state = state().await;
        let author_id = seed_author(&state).await;
        let (_, Json(post)) = create_post(State(state.clone()), Json(new_post_req(author_id)))
            .await
            .unwrap();

        let req = UpdatePostRequest {
            is_published: Some(true),
            ..Default::default()
        };
        let Json(updated) = update_post(State(state), Path(post.id), Json(req))
            .await
            .unwrap();

        assert!(updated.is_published);
        assert_eq!(updated.title, post.title);
        assert_eq!(updated.content, post.content);
    }

    #[tokio::test]
    async fn post_with_author_nests_author() {
        let state = state().await;
        let author_id = seed_author(&state).await;
        let (_, Json(post)) = create_post(State(state.clone()), Json(new_post_req(author_id)))
            .await
            .unwrap();

        let Json(with_author) = get_post_author(State(state), Path(post.id)).await.unwrap();
        assert_eq!(with_author.post.id, post.id);
        assert_eq!(with_author.author.id, author_id);
        assert_eq!(with_author.author.username, "author");

        // The nested author projection carries no credential material.
        let body = serde_json::to_string(&with_author).unwrap();
        assert!(!body.contains("password"));
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let state = state().await;
        let err = delete_post(State(state), Path(41)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
