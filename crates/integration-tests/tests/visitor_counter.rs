//! Integration tests for the session visitor counter.

use axum::http::StatusCode;

use waymark_integration_tests::{TestContext, body_text, session_cookie};

#[tokio::test]
async fn test_first_visit_counts_one() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Visits: 1"), "index shows the visit counter");
}

#[tokio::test]
async fn test_same_day_revisit_does_not_increment() {
    let ctx = TestContext::new().await;

    let first = ctx.get("/", None).await;
    let cookie = session_cookie(&first).expect("visit creates a session");

    let second = ctx.get("/", Some(&cookie)).await;
    assert_eq!(second.status(), StatusCode::OK);

    let body = body_text(second).await;
    assert!(
        body.contains("Visits: 1"),
        "same-day revisit must not increment the counter"
    );
}

#[tokio::test]
async fn test_about_page_shares_the_counter() {
    let ctx = TestContext::new().await;

    let index = ctx.get("/", None).await;
    let cookie = session_cookie(&index).expect("visit creates a session");

    let about = ctx.get("/about", Some(&cookie)).await;
    assert_eq!(about.status(), StatusCode::OK);

    let body = body_text(about).await;
    assert!(body.contains("visited this site on 1 different days"));
}
