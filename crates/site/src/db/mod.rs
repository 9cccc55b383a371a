//! Database operations for the site's SQLite store.
//!
//! # Tables
//!
//! - `users` - Site accounts (argon2 password hashes)
//! - `categories` - Directory categories
//! - `pages` - External links scoped to a category
//! - `user_profiles` - One-to-one profile extension of users
//! - `tower_sessions` - Session storage, created by the session store itself
//!   at startup (see `middleware::create_session_layer`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p waymark-cli -- migrate
//! ```

pub mod categories;
pub mod pages;
pub mod profiles;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use categories::CategoryRepository;
pub use pages::PageRepository;
pub use profiles::ProfileRepository;
pub use users::UserRepository;

/// Embedded migrations for the site database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// Foreign keys are enabled per connection so `ON DELETE CASCADE` holds.
///
/// # Arguments
///
/// * `database_url` - SQLite URL (`sqlite:waymark.db`) or a bare file path
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::MIGRATOR;
    use sqlx::SqlitePool;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    /// In-memory pool with migrations applied.
    ///
    /// A single connection keeps every query on the same in-memory database.
    pub async fn pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid connection string")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("in-memory database");

        MIGRATOR.run(&pool).await.expect("migrations apply");
        pool
    }
}
