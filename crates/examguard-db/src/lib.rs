//! # ExamGuard DB
//!
//! PostgreSQL pool initialization and schema migrations.
//!
//! # Example
//!
//! ```ignore
//! use examguard_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool().await?;
//! run_migrations(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

fn database_url() -> anyhow::Result<String> {
    env::var("DATABASE_URL").context("DATABASE_URL must be set")
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(
            env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        )
        .acquire_timeout(Duration::from_secs(10))
}

/// Connects to `DATABASE_URL`, failing if the server is unreachable.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let url = database_url()?;
    let pool = pool_options()
        .connect(&url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");
    Ok(pool)
}

/// Builds a pool without opening a connection. Connections are made on
/// first use, so the server can start while the database is still coming up
/// and `/ready` reports the difference.
pub fn init_lazy_db_pool(url: &str) -> anyhow::Result<PgPool> {
    pool_options()
        .connect_lazy(url)
        .context("Invalid DATABASE_URL")
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// `SELECT 1` round trip used by readiness checks.
pub async fn ping(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    }
}
