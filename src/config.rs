//! Application configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `APP_ENV`: `development` (default) or `production`
//! - `DATABASE_URL`: required in production; development defaults to a
//!   local SQLite file
//! - `DATABASE_MAX_CONNECTIONS`, `DATABASE_ACQUIRE_TIMEOUT_SECS`
//! - `DATABASE_ECHO`: log executed SQL statements
//! - `DATABASE_RESET`: drop and recreate all tables on startup (destructive)
//! - `BIND_ADDR`, `REQUEST_TIMEOUT_SECS`

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Development database file, used when `DATABASE_URL` is unset.
const DEV_DATABASE_URL: &str = "sqlite://miniblog.db";

/// Deployment environment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => bail!("APP_ENV must be 'development' or 'production', got '{other}'"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    /// Log executed statements (development debugging aid)
    pub database_echo: bool,
    /// Destructive: drop all tables before recreating them. Never the default.
    pub database_reset: bool,
    pub bind_addr: SocketAddr,
    /// Per-request ceiling so a stalled storage operation cannot hold a
    /// pooled connection indefinitely
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// In production a `DATABASE_URL` must be provided explicitly; only
    /// development falls back to the local file store.
    pub fn from_env() -> Result<Self> {
        let env = match std::env::var("APP_ENV") {
            Ok(value) => Environment::parse(&value)?,
            Err(_) => Environment::Development,
        };

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if env == Environment::Development => DEV_DATABASE_URL.to_owned(),
            Err(_) => bail!("DATABASE_URL is required when APP_ENV=production"),
        };

        let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_owned())
            .parse()
            .context("BIND_ADDR must be a socket address like 127.0.0.1:8000")?;

        Ok(Self {
            env,
            database_url,
            database_max_connections: env_u64("DATABASE_MAX_CONNECTIONS", 5)? as u32,
            database_acquire_timeout: Duration::from_secs(env_u64(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                10,
            )?),
            database_echo: env_bool("DATABASE_ECHO", false)?,
            database_reset: env_bool("DATABASE_RESET", false)?,
            bind_addr,
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be a positive integer, got '{value}'")),
        Err(_) => Ok(default),
    }
}

fn env_bool(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => match value.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => bail!("{name} must be true or false, got '{other}'"),
        },
        Err(_) => Ok(default),
    }
}
