//! Authentication service.
//!
//! Provides username/password registration and login over the `users` table.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use waymark_core::Username;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles account registration and login; the session side (who is the
/// current actor) lives in `middleware::auth`.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // Validate username
        let username = Username::parse(username)?;

        // Validate password
        validate_password(password)?;

        // Hash password
        let password_hash = hash_password(password)?;

        // Create user
        let user = self
            .users
            .create_with_password(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    /// Returns `AuthError::AccountDisabled` if the account is inactive.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // Validate username format
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        // Get user with password hash
        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Verify password before revealing anything about the account state
        verify_password(password, &password_hash)?;

        if !user.active {
            return Err(AuthError::AccountDisabled);
        }

        Ok(user)
    }
}

/// Validate password strength requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_register_and_login_roundtrip() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let user = auth.register("wanda90", "correct horse").await.unwrap();
        assert_eq!(user.username.as_str(), "wanda90");

        let logged_in = auth.login("wanda90", "correct horse").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        auth.register("wanda90", "correct horse").await.unwrap();
        let err = auth.login("wanda90", "wrong horse").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let err = auth.login("nobody", "whatever1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let err = auth.register("wanda90", "short").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        auth.register("wanda90", "correct horse").await.unwrap();
        let err = auth
            .register("wanda90", "another pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let err = auth.register("has space", "longenough").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidUsername(_)));
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        auth.register("wanda90", "correct horse").await.unwrap();
        sqlx::query("UPDATE users SET active = 0 WHERE username = 'wanda90'")
            .execute(&pool)
            .await
            .unwrap();

        let err = auth.login("wanda90", "correct horse").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled));
    }
}
