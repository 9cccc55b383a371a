//! Seed the database with starter directory content.
//!
//! Inserts a handful of categories with well-known pages so a fresh checkout
//! renders a populated index, plus an optional `demo` account. Seeding is
//! idempotent: rows that already exist are left alone, counters included.

use sqlx::SqlitePool;
use tracing::info;

use waymark_core::Slug;
use waymark_site::services::auth::{AuthError, AuthService};

use super::database_url;

/// A page to seed: title, url, starting view count.
type SeedPage = (&'static str, &'static str, i64);

/// A category to seed: name, starting like count, pages.
type SeedCategory = (&'static str, i64, &'static [SeedPage]);

/// Starter directory content.
const SEED_CATEGORIES: &[SeedCategory] = &[
    (
        "Python",
        64,
        &[
            (
                "Official Python Tutorial",
                "https://docs.python.org/3/tutorial/",
                128,
            ),
            (
                "How to Think like a Computer Scientist",
                "https://www.greenteapress.com/thinkpython/",
                64,
            ),
            (
                "Learn Python in 10 Minutes",
                "https://www.stavros.io/tutorials/python/",
                32,
            ),
        ],
    ),
    (
        "Rust",
        32,
        &[
            (
                "The Rust Programming Language",
                "https://doc.rust-lang.org/book/",
                64,
            ),
            (
                "Rust by Example",
                "https://doc.rust-lang.org/rust-by-example/",
                32,
            ),
            ("Rustlings", "https://github.com/rust-lang/rustlings", 16),
        ],
    ),
    (
        "Other Frameworks",
        16,
        &[
            ("Bottle", "https://bottlepy.org/docs/dev/", 16),
            ("Flask", "https://flask.palletsprojects.com/", 8),
        ],
    ),
];

/// Seed starter content and an optional demo account.
///
/// # Errors
///
/// Returns an error if environment variables are missing or database
/// operations fail.
pub async fn run(demo_password: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;
    let pool = waymark_site::db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut categories_inserted = 0_u32;
    let mut pages_inserted = 0_u32;

    for (name, likes, pages) in SEED_CATEGORIES {
        let slug = Slug::from_name(name)?;
        categories_inserted += insert_category(&pool, name, &slug, *likes).await?;

        let category_id: i64 = sqlx::query_scalar("SELECT id FROM categories WHERE slug = ?1")
            .bind(&slug)
            .fetch_one(&pool)
            .await?;

        for (title, url, views) in *pages {
            pages_inserted += insert_page(&pool, category_id, title, url, *views).await?;
        }
    }

    info!("Seeding complete!");
    info!("  Categories inserted: {categories_inserted}");
    info!("  Pages inserted: {pages_inserted}");

    if let Some(password) = demo_password {
        seed_demo_account(&pool, password).await?;
    }

    Ok(())
}

/// Insert a category if it doesn't exist yet. Returns 1 on insert, 0 on skip.
async fn insert_category(
    pool: &SqlitePool,
    name: &str,
    slug: &Slug,
    likes: i64,
) -> Result<u32, sqlx::Error> {
    let result = sqlx::query(
        r"
        INSERT INTO categories (name, slug, likes)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (name) DO NOTHING
        ",
    )
    .bind(name)
    .bind(slug)
    .bind(likes)
    .execute(pool)
    .await?;

    Ok(u32::try_from(result.rows_affected()).unwrap_or(0))
}

/// Insert a page if the category doesn't already have one with this title.
/// Returns 1 on insert, 0 on skip.
async fn insert_page(
    pool: &SqlitePool,
    category_id: i64,
    title: &str,
    url: &str,
    views: i64,
) -> Result<u32, sqlx::Error> {
    let result = sqlx::query(
        r"
        INSERT INTO pages (category_id, title, url, views)
        SELECT ?1, ?2, ?3, ?4
        WHERE NOT EXISTS (
            SELECT 1 FROM pages WHERE category_id = ?1 AND title = ?2
        )
        ",
    )
    .bind(category_id)
    .bind(title)
    .bind(url)
    .bind(views)
    .execute(pool)
    .await?;

    Ok(u32::try_from(result.rows_affected()).unwrap_or(0))
}

/// Create the `demo` account unless it already exists.
async fn seed_demo_account(
    pool: &SqlitePool,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match AuthService::new(pool).register("demo", password).await {
        Ok(user) => {
            info!(username = %user.username, "Demo account created");
            Ok(())
        }
        Err(AuthError::UserAlreadyExists) => {
            info!("Demo account already exists, skipping");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
