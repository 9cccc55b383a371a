//! Integration tests for registration, login, logout, and protected routes.

use axum::http::StatusCode;

use waymark_integration_tests::{TestContext, location, session_cookie};

#[tokio::test]
async fn test_register_then_login_then_restricted() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/auth/register",
            "username=wanda&password=opensesame123&password_confirm=opensesame123",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("/auth/login?success=registered".to_owned())
    );

    let response = ctx
        .post_form("/auth/login", "username=wanda&password=opensesame123", None)
        .await;
    assert_eq!(location(&response), Some("/".to_owned()));
    let cookie = session_cookie(&response).expect("login sets a session cookie");

    let response = ctx.get("/restricted", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_restricted_requires_auth() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/restricted", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login".to_owned()));
}

#[tokio::test]
async fn test_login_bad_password_redirects_with_error() {
    let ctx = TestContext::new().await;
    ctx.sign_up_and_log_in("wanda", "opensesame123").await;

    let response = ctx
        .post_form("/auth/login", "username=wanda&password=wrongsesame99", None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("/auth/login?error=credentials".to_owned())
    );
}

#[tokio::test]
async fn test_register_password_mismatch_redirects_with_error() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            "/auth/register",
            "username=wanda&password=opensesame123&password_confirm=differentpass1",
            None,
        )
        .await;
    assert_eq!(
        location(&response),
        Some("/auth/register?error=password_mismatch".to_owned())
    );
}

#[tokio::test]
async fn test_register_duplicate_username_redirects_with_error() {
    let ctx = TestContext::new().await;
    ctx.sign_up_and_log_in("wanda", "opensesame123").await;

    let response = ctx
        .post_form(
            "/auth/register",
            "username=wanda&password=opensesame123&password_confirm=opensesame123",
            None,
        )
        .await;
    assert_eq!(
        location(&response),
        Some("/auth/register?error=username_taken".to_owned())
    );
}

#[tokio::test]
async fn test_logout_clears_the_session() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_up_and_log_in("wanda", "opensesame123").await;

    let response = ctx.post_form("/auth/logout", "", Some(&cookie)).await;
    assert_eq!(location(&response), Some("/".to_owned()));

    // The old cookie no longer grants access to protected pages.
    let response = ctx.get("/restricted", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login".to_owned()));
}
