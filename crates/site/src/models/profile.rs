//! User profile domain types.

use waymark_core::{UserId, Username};

/// One-to-one profile extension of an account.
///
/// Created lazily on first profile view (find-or-create at the repository
/// boundary), so both fields start out empty.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    /// Owning user.
    pub user_id: UserId,
    /// Optional personal website URL.
    pub website: Option<String>,
    /// Optional image reference.
    pub picture: Option<String>,
}

/// Profile joined with its owner's username, for the profile list page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileListing {
    /// Owner's username.
    pub username: Username,
    /// Optional personal website URL.
    pub website: Option<String>,
    /// Optional image reference.
    pub picture: Option<String>,
}
