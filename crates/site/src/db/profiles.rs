//! User profile repository for database operations.

use sqlx::SqlitePool;

use waymark_core::UserId;

use super::RepositoryError;
use crate::models::{ProfileListing, UserProfile};

/// Repository for user profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a profile by its owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r"
            SELECT user_id, website, picture
            FROM user_profiles
            WHERE user_id = ?1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Get a user's profile, creating an empty one if none exists yet.
    ///
    /// The insert ignores conflicts, so concurrent first views of the same
    /// profile both land on the same row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the row vanishes between
    /// insert and select (the owning user was deleted).
    pub async fn find_or_create(&self, user_id: UserId) -> Result<UserProfile, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO user_profiles (user_id)
            VALUES (?1)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.get(user_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("profile for user {user_id} disappeared"))
        })
    }

    /// Create a profile with initial values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a profile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        website: Option<&str>,
        picture: Option<&str>,
    ) -> Result<UserProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r"
            INSERT INTO user_profiles (user_id, website, picture)
            VALUES (?1, ?2, ?3)
            RETURNING user_id, website, picture
            ",
        )
        .bind(user_id)
        .bind(website)
        .bind(picture)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("profile already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(profile)
    }

    /// Update a profile in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        user_id: UserId,
        website: Option<&str>,
        picture: Option<&str>,
    ) -> Result<UserProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r"
            UPDATE user_profiles
            SET website = ?2, picture = ?3
            WHERE user_id = ?1
            RETURNING user_id, website, picture
            ",
        )
        .bind(user_id)
        .bind(website)
        .bind(picture)
        .fetch_optional(self.pool)
        .await?;

        profile.ok_or(RepositoryError::NotFound)
    }

    /// Get all profiles joined with their owners' usernames.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_usernames(&self) -> Result<Vec<ProfileListing>, RepositoryError> {
        let listings = sqlx::query_as::<_, ProfileListing>(
            r"
            SELECT u.username, p.website, p.picture
            FROM user_profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY u.username ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(listings)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use crate::db::UserRepository;
    use waymark_core::Username;

    async fn seed_user(pool: &SqlitePool, name: &str) -> UserId {
        let repo = UserRepository::new(pool);
        let username = Username::parse(name).unwrap();
        repo.create_with_password(&username, "$argon2id$fake")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let pool = test_support::pool().await;
        let user_id = seed_user(&pool, "wanda90").await;
        let repo = ProfileRepository::new(&pool);

        let first = repo.find_or_create(user_id).await.unwrap();
        assert!(first.website.is_none());

        let updated = repo
            .update(user_id, Some("https://wanda.example/"), None)
            .await
            .unwrap();
        assert!(updated.website.is_some());

        // A second find-or-create must not reset the stored values.
        let again = repo.find_or_create(user_id).await.unwrap();
        assert_eq!(again.website, updated.website);
    }

    #[tokio::test]
    async fn test_create_twice_is_conflict() {
        let pool = test_support::pool().await;
        let user_id = seed_user(&pool, "wanda90").await;
        let repo = ProfileRepository::new(&pool);

        repo.create(user_id, None, None).await.unwrap();
        let err = repo.create(user_id, None, None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let pool = test_support::pool().await;
        let repo = ProfileRepository::new(&pool);

        let err = repo
            .update(UserId::new(404), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_with_usernames() {
        let pool = test_support::pool().await;
        let repo = ProfileRepository::new(&pool);

        let a = seed_user(&pool, "alex-r").await;
        let b = seed_user(&pool, "wanda90").await;
        repo.find_or_create(b).await.unwrap();
        repo.find_or_create(a).await.unwrap();

        let listings = repo.list_with_usernames().await.unwrap();
        let names: Vec<_> = listings.iter().map(|l| l.username.as_str()).collect();
        assert_eq!(names, vec!["alex-r", "wanda90"]);
    }
}
