//! # Registrar DB
//!
//! Persistence for student records behind the [`StudentStore`] trait:
//!
//! - [`PgStudentStore`]: PostgreSQL via SQLx, schema in `migrations/`
//! - [`InMemoryStudentStore`]: process-local map used by tests and local runs
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use registrar_db::{PgStudentStore, StudentStore, init_db_pool};
//!
//! let pool = init_db_pool(&database_url).await?;
//! registrar_db::run_migrations(&pool).await?;
//! let store: Arc<dyn StudentStore> = Arc::new(PgStudentStore::new(pool));
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryStudentStore;
pub use postgres::PgStudentStore;
pub use store::{StoreError, StudentStore};

pub use sqlx::PgPool;

/// Connects a PostgreSQL pool to `database_url`.
///
/// Called once during startup; the pool is cheaply cloneable.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
