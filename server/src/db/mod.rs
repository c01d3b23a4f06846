//! Database Layer
//!
//! `PostgreSQL` connection pool, models, and queries.

mod models;
mod queries;

use std::time::Duration;

use anyhow::Result;
pub use models::*;
pub use queries::*;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Create `PostgreSQL` connection pool with health configuration.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        // Keep minimum connections warm to prevent cold-start latency
        .min_connections(2)
        .max_connections(10)
        // Prevent hanging requests on pool exhaustion
        .acquire_timeout(Duration::from_secs(5))
        // Clean up idle connections to prevent stale connection issues
        .idle_timeout(Duration::from_secs(600))
        // Validate connections before use to catch stale/broken connections
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
