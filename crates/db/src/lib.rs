//! Postgres storage for geolocation records.
//!
//! The pool is always created explicitly from a [`DbConfig`] and passed by
//! reference into every repository call. Prepared statements are cached per
//! connection, with the capacity set on the pool's connect options.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Errors raised while reading [`DbConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum DbConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    /// Upper bound on pooled connections (default: `20`).
    pub max_connections: u32,
    /// Prepared statements kept per connection (default: `100`).
    pub statement_cache_capacity: usize,
}

impl DbConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
    pub const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 100;

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            statement_cache_capacity: Self::DEFAULT_STATEMENT_CACHE_CAPACITY,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                       | Default    |
    /// |-------------------------------|------------|
    /// | `DATABASE_URL`                | (required) |
    /// | `DB_MAX_CONNECTIONS`          | `20`       |
    /// | `DB_STATEMENT_CACHE_CAPACITY` | `100`      |
    pub fn from_env() -> Result<Self, DbConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| DbConfigError::Missing("DATABASE_URL"))?;

        let mut config = Self::new(database_url);
        if let Some(n) = env_number("DB_MAX_CONNECTIONS")? {
            config.max_connections = n;
        }
        if let Some(n) = env_number("DB_STATEMENT_CACHE_CAPACITY")? {
            config.statement_cache_capacity = n;
        }
        Ok(config)
    }
}

fn env_number<T: FromStr>(name: &'static str) -> Result<Option<T>, DbConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DbConfigError::NotANumber { name, value }),
        Err(_) => Ok(None),
    }
}

/// Create a connection pool from the given settings.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.database_url)?
        .statement_cache_capacity(config.statement_cache_capacity);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Close every pooled connection and wait for them to be released.
pub async fn close_pool(pool: &DbPool) {
    pool.close().await;
    tracing::debug!("Database pool closed");
}
