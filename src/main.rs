use anyhow::Context;
use tracing_subscriber::EnvFilter;

use miniblog::{config::AppConfig, db, http, Db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(env = ?config.env, "Starting miniblog");

    let db = Db::connect(&config).context("invalid database configuration")?;

    // Schema init failure must not kill the process: start degraded and let
    // /test-db and per-request errors report the state instead.
    match db::schema::initialize(db.pool(), config.database_reset).await {
        Ok(()) => {}
        Err(err) => {
            tracing::warn!("Schema initialization failed: {}", err);
            tracing::warn!(
                "Check that the database path is writable and the backing store is reachable; \
                 starting in degraded mode, database operations will fail until it recovers"
            );
        }
    }

    http::run_server(db, &config).await?;
    Ok(())
}
