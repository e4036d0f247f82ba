//! Data access layer: sqlx/Postgres models, repositories, and the
//! import/export and template services.

pub mod models;
pub mod repositories;
pub mod services;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Create a connection pool from the `DATABASE_URL` environment
/// variable, loading `.env` first if present.
pub async fn create_pool_from_env() -> anyhow::Result<DbPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    Ok(create_pool(&database_url).await?)
}

/// Run a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
