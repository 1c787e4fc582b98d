//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the policy system
//! using SQLx, following the repository pattern: the domain sees only
//! the `PolicyStore` port, and this crate supplies the adapter.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PolicyRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/polizas")).await?;
//! infra_db::run_migrations(&pool).await?;
//! let repo = PolicyRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::PolicyRepository;

/// Applies the embedded SQLx migrations
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if any migration cannot be
/// applied
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    tracing::info!("Database ready");
    Ok(())
}
