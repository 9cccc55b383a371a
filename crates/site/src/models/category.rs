//! Category domain type.

use waymark_core::{CategoryId, Slug};

/// A named, sluggable grouping of pages with a popularity counter.
///
/// Categories are never deleted by any handler; `likes` only moves up.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Unique display name.
    pub name: String,
    /// URL-safe identifier derived from the name.
    pub slug: Slug,
    /// Popularity counter, incremented by the like action.
    pub likes: i64,
}
