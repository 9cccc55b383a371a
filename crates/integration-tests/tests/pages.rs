//! Integration tests for page creation and the click-through redirect.

use axum::http::StatusCode;

use waymark_core::Slug;
use waymark_integration_tests::{TestContext, body_text, location};
use waymark_site::db::{CategoryRepository, PageRepository};
use waymark_site::models::Category;

async fn seed_category(ctx: &TestContext, name: &str) -> Category {
    let slug = Slug::from_name(name).expect("valid name");
    CategoryRepository::new(&ctx.pool)
        .create(name, &slug)
        .await
        .expect("create category")
}

#[tokio::test]
async fn test_goto_existing_page_counts_view_and_redirects() {
    let ctx = TestContext::new().await;
    let category = seed_category(&ctx, "Rust").await;

    let page = PageRepository::new(&ctx.pool)
        .create(category.id, "The Book", "https://doc.rust-lang.org/book/")
        .await
        .expect("create page");

    let response = ctx.get(&format!("/goto?page_id={}", page.id), None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("https://doc.rust-lang.org/book/".to_owned())
    );

    let views: i64 = sqlx::query_scalar("SELECT views FROM pages WHERE id = ?1")
        .bind(page.id.as_i64())
        .fetch_one(&ctx.pool)
        .await
        .expect("views query");
    assert_eq!(views, 1, "the view must be persisted before redirecting");
}

#[tokio::test]
async fn test_goto_missing_page_redirects_to_index() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/goto?page_id=999", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/".to_owned()));
}

#[tokio::test]
async fn test_goto_junk_page_id_fails_soft() {
    let ctx = TestContext::new().await;

    for uri in ["/goto", "/goto?page_id=", "/goto?page_id=abc"] {
        let response = ctx.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri: {uri}");
        assert_eq!(location(&response), Some("/".to_owned()), "uri: {uri}");
    }
}

#[tokio::test]
async fn test_add_page_to_missing_category_redirects_and_persists_nothing() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_up_and_log_in("wanda", "opensesame123").await;

    let response = ctx
        .post_form(
            "/category/ghost/add_page",
            "title=Somewhere&url=https%3A%2F%2Fexample.com%2F",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/".to_owned()));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pages")
        .fetch_one(&ctx.pool)
        .await
        .expect("count query");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_add_page_forces_views_to_zero() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_up_and_log_in("wanda", "opensesame123").await;
    seed_category(&ctx, "Rust").await;

    // The form smuggles a views field; it must be ignored.
    let response = ctx
        .post_form(
            "/category/rust/add_page",
            "title=The+Book&url=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F&views=99",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/category/rust".to_owned()));

    let views: i64 = sqlx::query_scalar("SELECT views FROM pages WHERE title = 'The Book'")
        .fetch_one(&ctx.pool)
        .await
        .expect("views query");
    assert_eq!(views, 0);
}

#[tokio::test]
async fn test_add_page_invalid_url_re_renders_with_error() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_up_and_log_in("wanda", "opensesame123").await;
    seed_category(&ctx, "Rust").await;

    let response = ctx
        .post_form(
            "/category/rust/add_page",
            "title=The+Book&url=not-a-url",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Please enter a valid http(s) URL."));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pages")
        .fetch_one(&ctx.pool)
        .await
        .expect("count query");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_add_page_requires_auth() {
    let ctx = TestContext::new().await;
    seed_category(&ctx, "Rust").await;

    let response = ctx.get("/category/rust/add_page", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login".to_owned()));
}

#[tokio::test]
async fn test_detail_orders_pages_by_views() {
    let ctx = TestContext::new().await;
    let category = seed_category(&ctx, "Rust").await;
    let repo = PageRepository::new(&ctx.pool);

    repo.create(category.id, "Quiet Corner", "https://example.com/quiet")
        .await
        .expect("create page");
    let popular = repo
        .create(category.id, "Popular Pick", "https://example.com/popular")
        .await
        .expect("create page");
    repo.record_click(popular.id).await.expect("click");

    let response = ctx.get("/category/rust", None).await;
    let body = body_text(response).await;

    let popular_at = body.find("Popular Pick").expect("popular listed");
    let quiet_at = body.find("Quiet Corner").expect("quiet listed");
    assert!(popular_at < quiet_at, "most viewed page listed first");
}
