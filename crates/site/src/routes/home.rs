//! Home, about, and restricted route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::db::{CategoryRepository, PageRepository};
use crate::models::{Category, CurrentUser, Page};
use crate::services::visits;
use crate::state::AppState;

/// How many top categories/pages the index shows.
const TOP_COUNT: i64 = 5;

/// Index page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub categories: Vec<Category>,
    pub pages: Vec<Page>,
    pub visits: i64,
    pub current_user: Option<CurrentUser>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub visits: i64,
    pub current_user: Option<CurrentUser>,
}

/// Restricted placeholder template.
#[derive(Template, WebTemplate)]
#[template(path = "restricted.html")]
pub struct RestrictedTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Display the index page with the most liked categories and most viewed
/// pages, and touch the visitor counter.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<IndexTemplate> {
    let visits = visits::touch(&session).await?;

    let categories = CategoryRepository::new(state.pool())
        .top_by_likes(TOP_COUNT)
        .await?;
    let pages = PageRepository::new(state.pool())
        .top_by_views(TOP_COUNT)
        .await?;

    Ok(IndexTemplate {
        categories,
        pages,
        visits,
        current_user,
    })
}

/// Display the about page; shares the visitor counter with the index.
#[instrument(skip(session))]
pub async fn about(
    session: Session,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<AboutTemplate> {
    let visits = visits::touch(&session).await?;

    Ok(AboutTemplate {
        visits,
        current_user,
    })
}

/// Display the restricted placeholder page.
pub async fn restricted(RequireAuth(user): RequireAuth) -> RestrictedTemplate {
    RestrictedTemplate {
        current_user: Some(user),
    }
}
