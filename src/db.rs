// src/db.rs

//! Connection pool construction and schema management.
//!
//! The schema is kept in `migrations/` and embedded into the binary. Every
//! connection is opened with foreign-key enforcement on, and [`init_schema`]
//! refuses to continue if the database reports otherwise: cascade deletes and
//! completion-record integrity both depend on it.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] MigrateError),

    #[error("foreign key enforcement could not be enabled")]
    ForeignKeysDisabled,
}

/// Opens a file-backed SQLite pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!(max_connections, "Opening SQLite pool at {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

/// Opens a private in-memory database.
///
/// Every SQLite connection to `:memory:` sees its own database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Creates any missing tables and verifies foreign-key enforcement.
///
/// Never drops or rewrites existing data. Safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), SchemaError> {
    MIGRATOR.run(pool).await?;

    let enforced: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(pool)
        .await?;
    if enforced != 1 {
        return Err(SchemaError::ForeignKeysDisabled);
    }

    tracing::info!("Database schema is up to date");
    Ok(())
}

/// Round-trips a trivial query to confirm the database answers.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    if one != 1 {
        return Err(sqlx::Error::Protocol(format!(
            "health check returned unexpected value {}",
            one
        )));
    }
    Ok(())
}
