//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::SiteConfig;
use crate::services::search::SearchClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: SqlitePool,
    search: SearchClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `pool` - SQLite connection pool
    #[must_use]
    pub fn new(config: SiteConfig, pool: SqlitePool) -> Self {
        let search = SearchClient::new(&config.search);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                search,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the search collaborator client.
    #[must_use]
    pub fn search(&self) -> &SearchClient {
        &self.inner.search
    }
}
