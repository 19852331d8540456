//! Database configuration and pool bootstrap.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use gigbook_core::{AppError, AppResult};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection settings for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Loads settings from the environment.
    ///
    /// `DATABASE_URL` is required; `DATABASE_MAX_CONNECTIONS` defaults to 10.
    pub fn from_env() -> AppResult<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(10);

        Ok(Self {
            url,
            max_connections,
        })
    }
}

/// Connects a pool and applies pending migrations.
pub async fn connect_and_migrate(config: &DatabaseConfig) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.url.as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    info!("connected to database");

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!("migrations applied");

    Ok(pool)
}
