//! User domain types.

use chrono::{DateTime, Utc};

use waymark_core::{UserId, Username};

/// A site account (domain type).
///
/// The password hash is deliberately not part of this type; it only exists
/// inside the auth service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username, shown in profile URLs.
    pub username: Username,
    /// Inactive accounts cannot log in.
    pub active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
