//! Database connection management

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};

use crate::config::settings::DatabaseConfig as DatabaseSettings;
use crate::utils::errors::StudioError;

pub type DatabasePool = Pool<Postgres>;

/// Pool tuning derived from [`DatabaseSettings`]
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/yoga_studio".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            acquire_timeout: Duration::from_secs(settings.acquire_timeout_seconds),
            ..Self::default()
        }
    }
}

/// Open the PostgreSQL pool and make sure it answers before serving traffic
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, StudioError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool ready"
    );
    Ok(pool)
}

/// Apply the embedded schema migrations (users, teachers, sessions, participations)
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), StudioError> {
    info!("Applying schema migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Schema is up to date");
    Ok(())
}

/// Round-trip a trivial query; backs `GET /health`
pub async fn health_check(pool: &DatabasePool) -> Result<(), StudioError> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Database ping failed");
        StudioError::from(e)
    })?;
    Ok(())
}
