//! Database handle and connection pool
//!
//! One `Db` per process, constructed in main and passed down through
//! application state. The pool connects lazily so a missing or unreachable
//! backing store does not prevent the process from starting; individual
//! requests fail instead.

use std::str::FromStr;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::ConnectOptions;

use crate::config::AppConfig;
use crate::db::repos::DbError;
use crate::db::session::Scope;

/// Database handle wrapping the shared connection pool.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Build the pool from configuration.
    ///
    /// The pool is lazy: no connection is opened here, so this only fails
    /// on an unparseable database URL.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = AppConfig::from_env()?;
    /// let db = Db::connect(&config)?;
    /// ```
    pub fn connect(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let mut opts = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        opts = if config.database_echo {
            opts.log_statements(log::LevelFilter::Info)
        } else {
            opts.disable_statement_logging()
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(config.database_acquire_timeout)
            .connect_lazy_with(opts);

        Ok(Self { pool })
    }

    /// Access the underlying pool for read queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire a scoped unit of work for one logical request.
    ///
    /// The scope wraps a transaction: call [`Scope::commit`] on success;
    /// dropping the scope (error path, early return) rolls back and returns
    /// the connection to the pool.
    pub async fn acquire_scope(&self) -> Result<Scope, DbError> {
        let tx = self.pool.begin().await?;
        Ok(Scope::new(tx))
    }

    /// Round-trip a trivial query to check storage reachability.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
impl Db {
    /// Wrap an existing pool, for tests that need custom options.
    pub(crate) fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// In-memory database with the schema applied, for tests.
    ///
    /// Single connection: each SQLite `:memory:` connection is its own
    /// database, so the pool must never open a second one.
    pub(crate) async fn in_memory() -> Self {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("in-memory options")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(opts);

        let db = Self { pool };
        crate::db::schema::initialize(db.pool(), false)
            .await
            .expect("schema init");
        db
    }
}
