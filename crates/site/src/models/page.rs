//! Page domain type.

use waymark_core::{CategoryId, PageId};

/// An external link record scoped to one category.
///
/// `views` counts click-throughs recorded by the redirect handler.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Page {
    /// Unique page ID.
    pub id: PageId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Display title.
    pub title: String,
    /// External link target.
    pub url: String,
    /// Click-through counter.
    pub views: i64,
}
