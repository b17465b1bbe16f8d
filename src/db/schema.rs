//! Schema initialization
//!
//! Raw-SQL, idempotent `CREATE TABLE IF NOT EXISTS` statements. The
//! drop-first reset path exists for development but is opt-in via
//! `DATABASE_RESET`; the default never touches existing data.

use sqlx::SqlitePool;

/// Ensure the users and posts tables exist.
///
/// With `reset` set, all existing tables are dropped first. This destroys
/// every row in the database; it is never the default.
pub async fn initialize(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        tracing::warn!("DATABASE_RESET is set: dropping all tables before recreating them");
        drop_all(pool).await?;
    }

    tracing::info!("Ensuring database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            is_verified BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            is_published BOOLEAN NOT NULL DEFAULT 0,
            author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Drop both tables. Posts first so the foreign key never dangles.
async fn drop_all(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP TABLE IF EXISTS posts").execute(pool).await?;
    sqlx::query("DROP TABLE IF EXISTS users").execute(pool).await?;
    Ok(())
}
