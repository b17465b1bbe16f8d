//! Database layer - connection pool, scoped sessions, schema, repositories
//!
//! # Design Principles
//!
//! - One bounded connection pool, constructed explicitly and passed down
//! - Every write runs in a scoped unit of work: commit or roll back
//! - Constraints live in the schema; violations are translated, not probed
//! - Relationship traversal is an explicit query (no N+1, no lazy loading)

pub mod pool;
pub mod repos;
pub mod schema;
pub mod session;

pub use pool::Db;
pub use repos::*;
pub use session::Scope;
