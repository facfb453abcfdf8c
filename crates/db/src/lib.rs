//! Data access for the portfolio site: the document-store and object-store
//! seams, their backends, the TTL cache with write-through mutators, and the
//! cached CRUD façade over artworks and blog posts.

use sqlx::postgres::PgPoolOptions;

pub mod cache;
pub mod catalog;
pub mod error;
pub mod images;
pub mod memory;
pub mod models;
pub mod object_store;
pub mod postgres;
pub mod repositories;
pub mod s3;
pub mod store;
pub mod timeout;
pub mod write_through;

pub use catalog::{Catalog, CatalogConfig};
pub use error::{StoreError, StoreResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
