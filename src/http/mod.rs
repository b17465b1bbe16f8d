//! HTTP layer
//!
//! Axum server with per-resource routers, JSON error responses, and the
//! validation boundary between request bodies and the database layer.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{run_server, AppState};
