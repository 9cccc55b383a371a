//! Session-related types.
//!
//! Types stored in the session for authentication state, and the keys the
//! visitor counter persists.

use serde::{Deserialize, Serialize};

use waymark_core::{UserId, Username};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's username.
    pub username: Username,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor counter (string-encoded integer).
    pub const VISITS: &str = "visits";

    /// Key for the last recorded visit (string-encoded RFC 3339 timestamp).
    pub const LAST_VISIT: &str = "last_visit";
}
