//! Health and storage-probe endpoints
//!
//! `/health` reports process liveness only and never touches storage.
//! `/test-db` round-trips a query through the pool; on failure it returns
//! HTTP 500 with a structured body, so probes can tell "process up" from
//! "storage reachable".

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::http::server::AppState;

/// GET /health - process liveness, always 200
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "API is running"
    }))
}

/// GET /test-db - storage reachability probe
async fn test_db(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "Database connection successful"
            })),
        ),
        Err(err) => {
            tracing::error!("Database probe failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": format!("Database connection failed: {}", err),
                    "suggestion": "check that the database path is writable and the backing store is reachable"
                })),
            )
        }
    }
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/test-db", get(test_db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    #[tokio::test]
    async fn health_is_healthy_without_storage() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "API is running");
    }

    #[tokio::test]
    async fn test_db_success_on_live_store() {
        let state = Arc::new(AppState {
            db: Db::in_memory().await,
        });

        let (status, Json(body)) = test_db(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_db_reports_failure_when_store_down() {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        // A database file in a directory that does not exist.
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/missing/app.db", dir.path().display());
        let opts = SqliteConnectOptions::from_str(&url).unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_lazy_with(opts);
        let state = Arc::new(AppState {
            db: Db::from_pool(pool),
        });

        let (status, Json(body)) = test_db(State(state)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
    }
}
