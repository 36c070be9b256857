//! Database connection management

use sqlx::{Pool, Postgres};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::utils::errors::StudyBuddyError;

pub type DatabasePool = Pool<Postgres>;

/// Create a new database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, StudyBuddyError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), StudyBuddyError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<(), StudyBuddyError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await?;

    Ok(())
}
