//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum::Form;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::instrument;

use waymark_core::Slug;

use crate::db::{CategoryRepository, PageRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::middleware::OptionalAuth;
use crate::models::{Category, CurrentUser, Page};
use crate::services::search::SearchResult;
use crate::state::AppState;

/// Maximum length of a category name.
const MAX_NAME_LENGTH: usize = 128;

// =============================================================================
// Form Types
// =============================================================================

/// Category creation form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// Search form data posted to the category detail page.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

/// Field-level errors for the category creation form.
#[derive(Debug, Default)]
pub struct CategoryFormErrors {
    pub name: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Category detail template.
///
/// `category` is `None` for an unknown slug; the template renders a
/// "does not exist" message instead of an error page.
#[derive(Template, WebTemplate)]
#[template(path = "category/show.html")]
pub struct CategoryShowTemplate {
    pub category: Option<Category>,
    pub pages: Vec<Page>,
    pub search_query: String,
    pub search_results: Vec<SearchResult>,
    pub current_user: Option<CurrentUser>,
}

/// Category creation form template.
#[derive(Template, WebTemplate)]
#[template(path = "category/add.html")]
pub struct AddCategoryTemplate {
    pub name: String,
    pub errors: CategoryFormErrors,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Detail & Search
// =============================================================================

/// Resolve a category by its raw slug parameter, with its pages ordered by
/// descending view count.
///
/// An unparseable or unknown slug is a "not found" state, not an error.
async fn load_category(
    pool: &SqlitePool,
    raw_slug: &str,
) -> Result<(Option<Category>, Vec<Page>), AppError> {
    let Ok(slug) = Slug::parse(raw_slug) else {
        return Ok((None, Vec::new()));
    };

    let Some(category) = CategoryRepository::new(pool).get_by_slug(&slug).await? else {
        return Ok((None, Vec::new()));
    };

    let pages = PageRepository::new(pool).for_category(category.id).await?;
    Ok((Some(category), pages))
}

/// Display a category with its pages.
#[instrument(skip(state, current_user))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<CategoryShowTemplate, AppError> {
    let (category, pages) = load_category(state.pool(), &slug).await?;

    Ok(CategoryShowTemplate {
        category,
        pages,
        search_query: String::new(),
        search_results: Vec::new(),
        current_user,
    })
}

/// Run a search from the category detail page.
///
/// A failed collaborator call degrades to an empty result list; the page
/// itself still renders.
#[instrument(skip(state, user, form))]
pub async fn search(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<SearchForm>,
) -> Result<CategoryShowTemplate, AppError> {
    let (category, pages) = load_category(state.pool(), &slug).await?;

    let query = form.query.trim().to_owned();
    let mut search_results = Vec::new();

    if !query.is_empty() {
        match state.search().run_query(&query).await {
            Ok(results) => search_results = results,
            Err(e) => {
                tracing::warn!(error = %e, "search collaborator failed, rendering empty results");
            }
        }
    }

    Ok(CategoryShowTemplate {
        category,
        pages,
        search_query: query,
        search_results,
        current_user: Some(user),
    })
}

// =============================================================================
// Creation
// =============================================================================

/// Display the category creation form.
pub async fn add_category_page(RequireAuth(user): RequireAuth) -> AddCategoryTemplate {
    AddCategoryTemplate {
        name: String::new(),
        errors: CategoryFormErrors::default(),
        current_user: Some(user),
    }
}

/// Handle category creation form submission.
#[instrument(skip(state, user, form))]
pub async fn add_category(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim().to_owned();

    let rerender = |name: String, message: &str| {
        AddCategoryTemplate {
            name,
            errors: CategoryFormErrors {
                name: Some(message.to_owned()),
            },
            current_user: Some(user.clone()),
        }
        .into_response()
    };

    if name.is_empty() {
        return Ok(rerender(name, "Please enter the category name."));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Ok(rerender(name, "The category name is too long."));
    }

    let Ok(slug) = Slug::from_name(&name) else {
        return Ok(rerender(
            name,
            "The category name must contain letters or numbers.",
        ));
    };

    match CategoryRepository::new(state.pool()).create(&name, &slug).await {
        Ok(category) => {
            tracing::info!(slug = %category.slug, "category created");
            Ok(Redirect::to("/").into_response())
        }
        Err(RepositoryError::Conflict(_)) => Ok(rerender(
            name,
            "A category with this name already exists.",
        )),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Like
// =============================================================================

/// Handle a category like.
///
/// Unknown slugs fail soft with an index redirect; this is reached from a
/// plain form button on the detail page.
pub async fn like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequireAuth(_user): RequireAuth,
) -> Result<Response, AppError> {
    let Ok(slug) = Slug::parse(&slug) else {
        return Ok(Redirect::to("/").into_response());
    };

    match CategoryRepository::new(state.pool())
        .increment_likes(&slug)
        .await
    {
        Ok(_) => Ok(Redirect::to(&format!("/category/{slug}")).into_response()),
        Err(RepositoryError::NotFound) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}
