//! PostgreSQL access for leads, applications, tasks, and teams.
//!
//! Repositories are zero-sized structs whose async methods take `&PgPool`
//! first. User-scoped methods take a resolved [`Caller`] and filter rows
//! in SQL; `*_elevated` methods take a [`ServiceRole`] and do not.
//!
//! [`Caller`]: leadflow_core::access::Caller
//! [`ServiceRole`]: leadflow_core::access::ServiceRole

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations embedded from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
