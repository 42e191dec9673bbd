use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::User;

/// Pool against `TEST_DATABASE_URL` with migrations applied. Database-backed
/// tests call this and return early when the variable is unset, so the
/// default `cargo test` run stays green without Postgres.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");
    Some(pool)
}

/// Registers a throwaway user (with profile) and returns its id.
pub async fn seed_user(db: &PgPool) -> Uuid {
    let email = format!("seed-{}@example.com", Uuid::new_v4());
    User::create_with_profile(db, &email, "seed-hash")
        .await
        .expect("seed user")
        .expect("seed email unique")
        .id
}
