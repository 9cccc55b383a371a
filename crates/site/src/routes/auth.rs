//! Authentication route handlers.
//!
//! Handles login, registration, and logout. Failures travel as `?error=`
//! codes on the redirect, which the form pages turn back into messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Turn a redirect error code into a message for the form page.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid username or password.".to_owned(),
        "password_mismatch" => "The passwords do not match.".to_owned(),
        "password_too_short" => "The password must be at least 8 characters.".to_owned(),
        "username_taken" => "This username is already taken.".to_owned(),
        "invalid_username" => {
            "Usernames may only contain letters, digits, '_', '-' and '.'.".to_owned()
        }
        "session" => "Something went wrong with your session, please try again.".to_owned(),
        other => other.to_owned(),
    }
}

/// Turn a redirect success code into a message for the form page.
fn success_message(code: &str) -> String {
    match code {
        "registered" => "Account created. You can log in now.".to_owned(),
        other => other.to_owned(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub current_user: Option<CurrentUser>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    Query(query): Query<MessageQuery>,
    OptionalAuth(current_user): OptionalAuth,
) -> LoginTemplate {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().map(success_message),
        current_user,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                username: user.username,
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::AccountDisabled) => {
            tracing::warn!("Login failed");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    Query(query): Query<MessageQuery>,
    OptionalAuth(current_user): OptionalAuth,
) -> RegisterTemplate {
    RegisterTemplate {
        error: query.error.as_deref().map(error_message),
        current_user,
    }
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    // Validate passwords match before touching the service
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    match AuthService::new(state.pool())
        .register(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(username = %user.username, "account registered");
            Redirect::to("/auth/login?success=registered").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/auth/register?error=username_taken").into_response()
        }
        Err(AuthError::InvalidUsername(_)) => {
            Redirect::to("/auth/register?error=invalid_username").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/auth/register?error=password_too_short").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the current user and destroys the session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_known_codes() {
        assert_eq!(error_message("credentials"), "Invalid username or password.");
        assert_eq!(
            error_message("password_too_short"),
            "The password must be at least 8 characters."
        );
    }

    #[test]
    fn test_error_message_passthrough() {
        assert_eq!(error_message("weird_code"), "weird_code");
    }

    #[test]
    fn test_success_message() {
        assert_eq!(
            success_message("registered"),
            "Account created. You can log in now."
        );
    }
}
