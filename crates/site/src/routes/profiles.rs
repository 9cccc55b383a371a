//! Profile route handlers: registration, view/edit, and listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use waymark_core::Username;

use crate::db::{ProfileRepository, RepositoryError, UserRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, ProfileListing};
use crate::state::AppState;

/// Maximum length of a picture reference.
const MAX_PICTURE_LENGTH: usize = 256;

// =============================================================================
// Form Types
// =============================================================================

/// Profile form data (shared by registration and edit).
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub picture: String,
}

/// Field-level errors for the profile form.
#[derive(Debug, Default)]
pub struct ProfileFormErrors {
    pub website: Option<String>,
    pub picture: Option<String>,
}

/// Normalized profile form values: empty fields become `None`.
struct ProfileFormValues {
    website: Option<String>,
    picture: Option<String>,
}

/// Validate profile form input.
fn validate_profile_form(form: &ProfileForm) -> Result<ProfileFormValues, ProfileFormErrors> {
    let mut errors = ProfileFormErrors::default();

    let website = form.website.trim();
    let website = if website.is_empty() {
        None
    } else {
        match Url::parse(website) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                Some(parsed.to_string())
            }
            _ => {
                errors.website = Some("Please enter a valid http(s) URL.".to_owned());
                None
            }
        }
    };

    let picture = form.picture.trim();
    let picture = if picture.is_empty() {
        None
    } else if picture.len() > MAX_PICTURE_LENGTH {
        errors.picture = Some("The picture reference is too long.".to_owned());
        None
    } else {
        Some(picture.to_owned())
    };

    if errors.website.is_none() && errors.picture.is_none() {
        Ok(ProfileFormValues { website, picture })
    } else {
        Err(errors)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Profile registration form template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/register.html")]
pub struct RegisterProfileTemplate {
    pub website: String,
    pub picture: String,
    pub errors: ProfileFormErrors,
    pub current_user: Option<CurrentUser>,
}

/// Profile view/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileShowTemplate {
    pub profile_username: String,
    pub website: String,
    pub picture: String,
    pub is_owner: bool,
    pub errors: ProfileFormErrors,
    pub current_user: Option<CurrentUser>,
}

/// Profile list template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/list.html")]
pub struct ProfileListTemplate {
    pub profiles: Vec<ProfileListing>,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Registration
// =============================================================================

/// Display the profile registration form.
pub async fn register_form(RequireAuth(user): RequireAuth) -> RegisterProfileTemplate {
    RegisterProfileTemplate {
        website: String::new(),
        picture: String::new(),
        errors: ProfileFormErrors::default(),
        current_user: Some(user),
    }
}

/// Handle profile registration form submission.
///
/// Creates exactly one profile for the current account; an account that
/// already has one is sent to its profile page instead.
#[instrument(skip(state, user, form))]
pub async fn register(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let values = match validate_profile_form(&form) {
        Ok(values) => values,
        Err(errors) => {
            return Ok(RegisterProfileTemplate {
                website: form.website.trim().to_owned(),
                picture: form.picture.trim().to_owned(),
                errors,
                current_user: Some(user),
            }
            .into_response());
        }
    };

    match ProfileRepository::new(state.pool())
        .create(user.id, values.website.as_deref(), values.picture.as_deref())
        .await
    {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(RepositoryError::Conflict(_)) => Ok(Redirect::to(&format!(
            "/profile/{}",
            user.username
        ))
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// View / Edit
// =============================================================================

/// Display a profile, lazily creating it on first view.
///
/// Unknown usernames redirect to the index rather than erroring.
#[instrument(skip(state, current))]
pub async fn show(
    State(state): State<AppState>,
    Path(username): Path<String>,
    RequireAuth(current): RequireAuth,
) -> Result<Response, AppError> {
    let Ok(username) = Username::parse(&username) else {
        return Ok(Redirect::to("/").into_response());
    };

    let Some(user) = UserRepository::new(state.pool())
        .get_by_username(&username)
        .await?
    else {
        return Ok(Redirect::to("/").into_response());
    };

    let profile = ProfileRepository::new(state.pool())
        .find_or_create(user.id)
        .await?;

    let is_owner = current.username == username;
    Ok(ProfileShowTemplate {
        profile_username: username.to_string(),
        website: profile.website.unwrap_or_default(),
        picture: profile.picture.unwrap_or_default(),
        is_owner,
        errors: ProfileFormErrors::default(),
        current_user: Some(current),
    }
    .into_response())
}

/// Handle profile edit form submission.
///
/// Only the profile's owner may edit it; a mismatched or unknown username
/// redirects to the index.
#[instrument(skip(state, current, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let Ok(username) = Username::parse(&username) else {
        return Ok(Redirect::to("/").into_response());
    };

    if current.username != username {
        return Ok(Redirect::to("/").into_response());
    }

    let Some(user) = UserRepository::new(state.pool())
        .get_by_username(&username)
        .await?
    else {
        return Ok(Redirect::to("/").into_response());
    };

    let values = match validate_profile_form(&form) {
        Ok(values) => values,
        Err(errors) => {
            return Ok(ProfileShowTemplate {
                profile_username: username.to_string(),
                website: form.website.trim().to_owned(),
                picture: form.picture.trim().to_owned(),
                is_owner: true,
                errors,
                current_user: Some(current),
            }
            .into_response());
        }
    };

    let repo = ProfileRepository::new(state.pool());
    // The profile may not exist yet if the owner never viewed their own page.
    repo.find_or_create(user.id).await?;
    repo.update(user.id, values.website.as_deref(), values.picture.as_deref())
        .await?;

    Ok(Redirect::to(&format!("/profile/{username}")).into_response())
}

// =============================================================================
// Listing
// =============================================================================

/// Display all profiles.
#[instrument(skip(state, user))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ProfileListTemplate, AppError> {
    let profiles = ProfileRepository::new(state.pool())
        .list_with_usernames()
        .await?;

    Ok(ProfileListTemplate {
        profiles,
        current_user: Some(user),
    })
}
