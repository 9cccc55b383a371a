//! Category repository for database operations.

use sqlx::SqlitePool;

use waymark_core::Slug;

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, likes
            FROM categories
            WHERE slug = ?1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Get the most liked categories, best first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_by_likes(&self, limit: i64) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, likes
            FROM categories
            ORDER BY likes DESC, name ASC
            LIMIT ?1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Create a new category with `likes = 0`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, name: &str, slug: &Slug) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (name, slug)
            VALUES (?1, ?2)
            RETURNING id, name, slug, likes
            ",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("category already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(category)
    }

    /// Atomically increment a category's like counter.
    ///
    /// Returns the new counter value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the slug doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn increment_likes(&self, slug: &Slug) -> Result<i64, RepositoryError> {
        let likes = sqlx::query_scalar::<_, i64>(
            r"
            UPDATE categories
            SET likes = likes + 1
            WHERE slug = ?1
            RETURNING likes
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        likes.ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_create_and_get_by_slug() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        let slug = Slug::from_name("Python").unwrap();
        let created = repo.create("Python", &slug).await.unwrap();
        assert_eq!(created.name, "Python");
        assert_eq!(created.likes, 0);

        let fetched = repo.get_by_slug(&slug).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_get_by_slug_missing() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        let slug = Slug::parse("nope").unwrap();
        assert!(repo.get_by_slug(&slug).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        let slug = Slug::from_name("Axum").unwrap();
        repo.create("Axum", &slug).await.unwrap();

        let err = repo.create("Axum", &slug).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_top_by_likes_orders_descending() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        for name in ["Python", "Axum", "Other Frameworks"] {
            let slug = Slug::from_name(name).unwrap();
            repo.create(name, &slug).await.unwrap();
        }

        let axum = Slug::parse("axum").unwrap();
        repo.increment_likes(&axum).await.unwrap();
        repo.increment_likes(&axum).await.unwrap();

        let top = repo.top_by_likes(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top.first().unwrap().name, "Axum");
    }

    #[tokio::test]
    async fn test_increment_likes_missing_is_not_found() {
        let pool = test_support::pool().await;
        let repo = CategoryRepository::new(&pool);

        let slug = Slug::parse("nope").unwrap();
        let err = repo.increment_likes(&slug).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
