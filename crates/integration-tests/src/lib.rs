//! Integration tests for Waymark.
//!
//! Tests drive the fully assembled router in-process over an in-memory
//! SQLite database: no running server or external services required.
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//! let response = ctx.get("/", None).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tower::util::ServiceExt;

use waymark_site::config::{SearchConfig, SiteConfig};
use waymark_site::state::AppState;
use waymark_site::{db, middleware, routes};

/// An in-process site instance backed by an in-memory database.
pub struct TestContext {
    /// Direct database access for seeding and assertions.
    pub pool: SqlitePool,
    router: Router,
}

impl TestContext {
    /// Build a fresh site with migrations applied and no data.
    ///
    /// # Panics
    ///
    /// Panics when the in-memory database cannot be set up; tests cannot
    /// proceed without it.
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid connection string")
            .foreign_keys(true);

        // One connection keeps every request on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("in-memory database");

        db::MIGRATOR.run(&pool).await.expect("migrations apply");

        let config = SiteConfig {
            database_url: "sqlite::memory:".to_owned(),
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://localhost:3000".to_owned(),
            search: SearchConfig::default(),
        };

        let state = AppState::new(config.clone(), pool.clone());

        let session_layer = middleware::create_session_layer(&pool, &config)
            .await
            .expect("session store");

        let router = Router::new()
            .merge(routes::routes())
            .layer(session_layer)
            .with_state(state);

        Self { pool, router }
    }

    /// Send a GET request, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    /// Send a form POST request, optionally with a session cookie.
    pub async fn post_form(
        &self,
        path: &str,
        body: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder
            .body(Body::from(body.to_owned()))
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Register an account and log in, returning the session cookie.
    pub async fn sign_up_and_log_in(&self, username: &str, password: &str) -> String {
        let body = format!("username={username}&password={password}&password_confirm={password}");
        let response = self.post_form("/auth/register", &body, None).await;
        assert!(
            response.status().is_redirection(),
            "registration should redirect, got {}",
            response.status()
        );

        let body = format!("username={username}&password={password}");
        let response = self.post_form("/auth/login", &body, None).await;
        assert_eq!(
            location(&response),
            Some("/".to_owned()),
            "login should redirect to the index"
        );

        session_cookie(&response).expect("login sets a session cookie")
    }
}

/// Extract the `Location` header from a response.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

/// Extract the session cookie (name=value) from a response.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_owned)
}

/// Read a response body to a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8_lossy(&bytes).into_owned()
}
