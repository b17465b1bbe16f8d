//! miniblog: a minimal user and post management API
//!
//! Three layers, leaf to root:
//! - [`models`]: validated domain types; untrusted input is parsed into
//!   these before it can touch storage
//! - [`db`]: connection pool, scoped units of work, schema, repositories
//! - [`http`]: axum routers projecting records into response shapes

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::AppConfig;
pub use db::Db;
