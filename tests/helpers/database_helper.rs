//! Test database helper utilities
//!
//! Integration tests run against a real PostgreSQL instance pointed to by
//! `TEST_DATABASE_URL`. When the variable is unset the tests skip themselves,
//! so the suite stays green on machines without a database.

use sqlx::PgPool;

/// Connect to the test database, run migrations, and wipe both tables.
///
/// Returns `None` when `TEST_DATABASE_URL` is not set; callers should treat
/// that as a skip.
pub async fn test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE registrations, events RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to clean test tables");

    Some(pool)
}
