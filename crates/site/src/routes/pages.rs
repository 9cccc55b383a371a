//! Page route handlers: creation and the click-through redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use waymark_core::{PageId, Slug};

use crate::db::{CategoryRepository, PageRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Category, CurrentUser};
use crate::state::AppState;

/// Maximum length of a page title.
const MAX_TITLE_LENGTH: usize = 128;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Page creation form data.
///
/// Anything else submitted alongside these fields (a `views` value, say) is
/// dropped on the floor; new pages always start at zero views.
#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub title: String,
    pub url: String,
}

/// Field-level errors for the page creation form.
#[derive(Debug, Default)]
pub struct PageFormErrors {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Query parameters for the click-through redirect.
///
/// `page_id` stays a string here so junk values fail soft instead of
/// producing a 400; this endpoint is reached from untrusted/cached links.
#[derive(Debug, Deserialize)]
pub struct GotoQuery {
    pub page_id: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Page creation form template.
#[derive(Template, WebTemplate)]
#[template(path = "page/add.html")]
pub struct AddPageTemplate {
    pub category: Category,
    pub title: String,
    pub url: String,
    pub errors: PageFormErrors,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Creation
// =============================================================================

/// Resolve the category a page is being added to.
///
/// `None` means the handler should short-circuit to an index redirect.
async fn resolve_category(
    state: &AppState,
    raw_slug: &str,
) -> Result<Option<Category>, AppError> {
    let Ok(slug) = Slug::parse(raw_slug) else {
        return Ok(None);
    };
    Ok(CategoryRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?)
}

/// Display the page creation form for a category.
#[instrument(skip(state, user))]
pub async fn add_page_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let Some(category) = resolve_category(&state, &slug).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(AddPageTemplate {
        category,
        title: String::new(),
        url: String::new(),
        errors: PageFormErrors::default(),
        current_user: Some(user),
    }
    .into_response())
}

/// Validate page form input, returning the normalized URL on success.
fn validate_page_form(title: &str, url: &str) -> Result<Url, PageFormErrors> {
    let mut errors = PageFormErrors::default();

    if title.is_empty() {
        errors.title = Some("Please enter the title of the page.".to_owned());
    } else if title.len() > MAX_TITLE_LENGTH {
        errors.title = Some("The page title is too long.".to_owned());
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(parsed),
        _ => {
            errors.url = Some("Please enter a valid http(s) URL.".to_owned());
            None
        }
    };

    match (errors.title.is_none() && errors.url.is_none(), parsed) {
        (true, Some(parsed)) => Ok(parsed),
        _ => Err(errors),
    }
}

/// Handle page creation form submission.
///
/// A missing category redirects to the index without rendering the form;
/// `views` is forced to 0 regardless of what was submitted.
#[instrument(skip(state, user, form))]
pub async fn add_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<PageForm>,
) -> Result<Response, AppError> {
    let Some(category) = resolve_category(&state, &slug).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let title = form.title.trim().to_owned();
    let url = form.url.trim();

    match validate_page_form(&title, url) {
        Ok(parsed) => {
            PageRepository::new(state.pool())
                .create(category.id, &title, parsed.as_str())
                .await?;
            tracing::info!(category = %category.slug, %title, "page created");
            Ok(Redirect::to(&format!("/category/{}", category.slug)).into_response())
        }
        Err(errors) => Ok(AddPageTemplate {
            category,
            title,
            url: url.to_owned(),
            errors,
            current_user: Some(user),
        }
        .into_response()),
    }
}

// =============================================================================
// Click-Through Redirect
// =============================================================================

/// Follow a page link: count the view, then redirect to the stored URL.
///
/// The increment is persisted before the redirect is issued. A missing or
/// malformed `page_id` redirects to the index instead of erroring.
#[instrument(skip(state))]
pub async fn goto(
    State(state): State<AppState>,
    Query(query): Query<GotoQuery>,
) -> Result<Response, AppError> {
    let Some(page_id) = query
        .page_id
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
    else {
        return Ok(Redirect::to("/").into_response());
    };

    match PageRepository::new(state.pool())
        .record_click(PageId::new(page_id))
        .await?
    {
        Some(url) => Ok(Redirect::to(&url).into_response()),
        None => Ok(Redirect::to("/").into_response()),
    }
}
