//! Persistence layer for the DoseMate backend.
//!
//! Handlers talk to the store traits ([`ProgressStore`], [`UserStore`],
//! [`MedicationStore`], [`DoseStore`]); the binary picks [`PgStore`] when a
//! database is configured and [`MemoryStore`] otherwise.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use store::memory::MemoryStore;
pub use store::pg::PgStore;
pub use store::{DoseStore, MedicationStore, ProgressStore, UserStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
