//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! wm-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `WAYMARK_DATABASE_URL` - SQLite database URL or file path
//!   (falls back to `DATABASE_URL`)

use super::{CommandError, database_url};

/// Run site database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to site database...");
    let pool = waymark_site::db::create_pool(&database_url).await?;

    tracing::info!("Running site migrations...");
    waymark_site::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Site migrations complete!");
    Ok(())
}
