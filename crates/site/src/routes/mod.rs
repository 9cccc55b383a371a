//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Index (top categories/pages, visit counter)
//! GET  /about                  - About page (visit counter)
//! GET  /health                 - Health check (registered in main)
//!
//! # Categories
//! GET  /category/{slug}        - Category detail (pages by view count)
//! POST /category/{slug}        - Search within the detail page (auth)
//! GET  /category/add           - Category creation form (auth)
//! POST /category/add           - Create category (auth)
//! GET  /category/{slug}/add_page - Page creation form (auth)
//! POST /category/{slug}/add_page - Create page (auth)
//! POST /category/{slug}/like   - Like a category (auth)
//!
//! # Pages
//! GET  /goto?page_id={id}      - Click-through redirect, counts the view
//!
//! # Profiles (auth)
//! GET  /register_profile       - Profile registration form
//! POST /register_profile       - Create profile
//! GET  /profile/{username}     - Profile view/edit form
//! POST /profile/{username}     - Update own profile
//! GET  /profiles               - All profiles
//!
//! # Misc
//! GET  /restricted             - Restricted placeholder (auth)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod categories;
pub mod home;
pub mod pages;
pub mod profiles;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add",
            get(categories::add_category_page).post(categories::add_category),
        )
        .route("/{slug}", get(categories::show).post(categories::search))
        .route(
            "/{slug}/add_page",
            get(pages::add_page_form).post(pages::add_page),
        )
        .route("/{slug}/like", post(categories::like))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/register_profile",
            get(profiles::register_form).post(profiles::register),
        )
        .route(
            "/profile/{username}",
            get(profiles::show).post(profiles::update),
        )
        .route("/profiles", get(profiles::list))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home and static-ish pages
        .route("/", get(home::index))
        .route("/about", get(home::about))
        .route("/restricted", get(home::restricted))
        // Click-through redirect
        .route("/goto", get(pages::goto))
        // Category routes
        .nest("/category", category_routes())
        // Profile routes (top-level paths)
        .merge(profile_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
