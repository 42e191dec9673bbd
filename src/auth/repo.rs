use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Registers a user: the user row and their default profile are written
    /// in one transaction, so a registered user always has exactly one
    /// profile. Returns `None` when the email is already taken (the unique
    /// constraint decides; a pre-check alone would race with concurrent
    /// registrations).
    pub async fn create_with_profile(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let mut tx = db.begin().await.context("begin tx")?;

        let user = match sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(u) => u,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => return Ok(None),
            Err(e) => return Err(anyhow::Error::from(e).context("insert user")),
        };

        crate::profile::repo::create_default_tx(&mut tx, user.id).await?;
        tx.commit().await.context("commit tx")?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn registration_leaves_exactly_one_profile() {
        let Some(db) = test_pool().await else { return };
        let email = format!("fridge-{}@example.com", Uuid::new_v4());

        let user = User::create_with_profile(&db, &email, "argon2-hash")
            .await
            .expect("register")
            .expect("email is free");

        let (profiles,): (i64,) =
            sqlx::query_as("SELECT count(*) FROM profiles WHERE user_id = $1")
                .bind(user.id)
                .fetch_one(&db)
                .await
                .expect("count profiles");
        assert_eq!(profiles, 1);

        let profile = crate::profile::repo::get(&db, user.id)
            .await
            .expect("load profile")
            .expect("profile exists");
        assert_eq!(profile.user_id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_not_inserted() {
        let Some(db) = test_pool().await else { return };
        let email = format!("fridge-{}@example.com", Uuid::new_v4());

        let first = User::create_with_profile(&db, &email, "hash-a")
            .await
            .expect("register");
        assert!(first.is_some());

        let second = User::create_with_profile(&db, &email, "hash-b")
            .await
            .expect("duplicate register must not error");
        assert!(second.is_none());

        let (users,): (i64,) = sqlx::query_as("SELECT count(*) FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&db)
            .await
            .expect("count users");
        assert_eq!(users, 1);
    }
}
