//! Page repository for database operations.

use sqlx::SqlitePool;

use waymark_core::{CategoryId, PageId};

use super::RepositoryError;
use crate::models::Page;

/// Repository for page database operations.
pub struct PageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PageRepository<'a> {
    /// Create a new page repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a page by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PageId) -> Result<Option<Page>, RepositoryError> {
        let page = sqlx::query_as::<_, Page>(
            r"
            SELECT id, category_id, title, url, views
            FROM pages
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(page)
    }

    /// Get all pages in a category, most viewed first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Page>, RepositoryError> {
        let pages = sqlx::query_as::<_, Page>(
            r"
            SELECT id, category_id, title, url, views
            FROM pages
            WHERE category_id = ?1
            ORDER BY views DESC, title ASC
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(pages)
    }

    /// Get the most viewed pages across all categories, best first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_by_views(&self, limit: i64) -> Result<Vec<Page>, RepositoryError> {
        let pages = sqlx::query_as::<_, Page>(
            r"
            SELECT id, category_id, title, url, views
            FROM pages
            ORDER BY views DESC, title ASC
            LIMIT ?1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(pages)
    }

    /// Create a new page in a category.
    ///
    /// `views` always starts at 0; submitted values never reach this point.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for a category deleted mid-request).
    pub async fn create(
        &self,
        category_id: CategoryId,
        title: &str,
        url: &str,
    ) -> Result<Page, RepositoryError> {
        let page = sqlx::query_as::<_, Page>(
            r"
            INSERT INTO pages (category_id, title, url)
            VALUES (?1, ?2, ?3)
            RETURNING id, category_id, title, url, views
            ",
        )
        .bind(category_id)
        .bind(title)
        .bind(url)
        .fetch_one(self.pool)
        .await?;

        Ok(page)
    }

    /// Record a click-through: atomically increment `views` and return the
    /// page's stored URL.
    ///
    /// Returns `None` when the page doesn't exist, so the caller can fail
    /// soft with an index redirect.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_click(&self, id: PageId) -> Result<Option<String>, RepositoryError> {
        let url = sqlx::query_scalar::<_, String>(
            r"
            UPDATE pages
            SET views = views + 1
            WHERE id = ?1
            RETURNING url
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use crate::db::CategoryRepository;
    use waymark_core::Slug;

    async fn seed_category(pool: &SqlitePool) -> CategoryId {
        let repo = CategoryRepository::new(pool);
        let slug = Slug::from_name("Python").unwrap();
        repo.create("Python", &slug).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_starts_with_zero_views() {
        let pool = test_support::pool().await;
        let category_id = seed_category(&pool).await;
        let repo = PageRepository::new(&pool);

        let page = repo
            .create(category_id, "Official Python Tutorial", "http://docs.python.org/3/tutorial/")
            .await
            .unwrap();
        assert_eq!(page.views, 0);
    }

    #[tokio::test]
    async fn test_record_click_increments_and_returns_url() {
        let pool = test_support::pool().await;
        let category_id = seed_category(&pool).await;
        let repo = PageRepository::new(&pool);

        let page = repo
            .create(category_id, "Python Docs", "https://docs.python.org/")
            .await
            .unwrap();

        let url = repo.record_click(page.id).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://docs.python.org/"));

        let reloaded = repo.get(page.id).await.unwrap().unwrap();
        assert_eq!(reloaded.views, 1);
    }

    #[tokio::test]
    async fn test_record_click_missing_page() {
        let pool = test_support::pool().await;
        let repo = PageRepository::new(&pool);

        let url = repo.record_click(PageId::new(404)).await.unwrap();
        assert!(url.is_none());
    }

    #[tokio::test]
    async fn test_for_category_orders_by_views() {
        let pool = test_support::pool().await;
        let category_id = seed_category(&pool).await;
        let repo = PageRepository::new(&pool);

        let quiet = repo
            .create(category_id, "Quiet", "https://example.com/quiet")
            .await
            .unwrap();
        let popular = repo
            .create(category_id, "Popular", "https://example.com/popular")
            .await
            .unwrap();

        repo.record_click(popular.id).await.unwrap();
        repo.record_click(popular.id).await.unwrap();
        repo.record_click(quiet.id).await.unwrap();

        let pages = repo.for_category(category_id).await.unwrap();
        let titles: Vec<_> = pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Popular", "Quiet"]);
    }
}
