//! CLI command implementations.

pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the site database URL from the environment.
///
/// Checks `WAYMARK_DATABASE_URL` first, then the generic `DATABASE_URL`.
pub(crate) fn database_url() -> Result<String, CommandError> {
    std::env::var("WAYMARK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("WAYMARK_DATABASE_URL"))
}
