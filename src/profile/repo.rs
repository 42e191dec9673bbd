use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::profile::model::{BudgetTier, Profile};

/// Creates the default profile for a freshly registered user, inside the
/// registration transaction so user and profile appear together.
pub async fn create_default_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (user_id)
        VALUES ($1)
        RETURNING user_id, household_size, dietary_preference, budget_tier, location, updated_at
        "#,
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(profile)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, household_size, dietary_preference, budget_tier, location, updated_at
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    household_size: i32,
    dietary_preference: &str,
    budget_tier: BudgetTier,
    location: &str,
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET household_size = $2, dietary_preference = $3, budget_tier = $4,
            location = $5, updated_at = now()
        WHERE user_id = $1
        RETURNING user_id, household_size, dietary_preference, budget_tier, location, updated_at
        "#,
    )
    .bind(user_id)
    .bind(household_size)
    .bind(dietary_preference)
    .bind(budget_tier)
    .bind(location)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}
