//! # Kinder DB
//!
//! Database pool, schema migrations and error classification for the Kinder API.
//!
//! # Example
//!
//! ```ignore
//! use kinder_db::{init_db_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool().await;
//!     run_migrations(&pool).await.expect("migrations failed");
//! }
//! ```

use std::env;

use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool.
///
/// Reads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS`
/// (default 10).
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!(max_connections, "Database pool initialized");
    pool
}

/// Applies the embedded migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// True when the error is a unique constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True when the error is a foreign key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Name of the violated constraint, if the store reported one.
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
