//! User endpoints
//!
//! Raw request bodies never reach the repositories: every create/update
//! field goes through a validated model type first, and responses project
//! only public columns (the password hash stays in the database layer).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::repos::{NewUser, PostRepo, UserPatch, UserRecord, UserRepo};
use crate::http::error::ApiError;
use crate::http::routes::posts::PostResponse;
use crate::http::server::AppState;
use crate::models::{EmailAddress, FullName, Password, Username};

/// Create user request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Update user request - every field optional; absent fields are untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

/// User response - public fields only
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            is_active: u.is_active,
            is_verified: u.is_verified,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// User with their posts (the one-to-many direction)
#[derive(Debug, Serialize)]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub user: UserResponse,
    pub posts: Vec<PostResponse>,
}

/// POST /users - create a user from validated input
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = Username::new(&req.username)?;
    let email = EmailAddress::new(&req.email)?;
    let full_name = FullName::new(&req.full_name)?;
    let password_hash = Password::new(&req.password)?
        .hash()
        .map_err(|e| ApiError::Internal {
            message: format!("password hashing failed: {e}"),
        })?;

    let user = UserRepo::new(&state.db)
        .create(NewUser {
            username,
            email,
            full_name,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users - list all users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.db).list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id} - get a single user
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.db).fetch(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/{id} - partial update
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let patch = UserPatch {
        username: req.username.as_deref().map(Username::new).transpose()?,
        email: req.email.as_deref().map(EmailAddress::new).transpose()?,
        full_name: req.full_name.as_deref().map(FullName::new).transpose()?,
        is_active: req.is_active,
    };

    let user = UserRepo::new(&state.db).update(id, patch).await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/{id} - delete a user and, by cascade, their posts
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    UserRepo::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{id}/posts - user together with all their posts
async fn get_user_posts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserWithPosts>, ApiError> {
    let user = UserRepo::new(&state.db).fetch(id).await?;
    let posts = PostRepo::new(&state.db).find_by_owner(id).await?;

    Ok(Json(UserWithPosts {
        user: UserResponse::from(user),
        posts: posts.into_iter().map(PostResponse::from).collect(),
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/{id}/posts", get(get_user_posts))
}
