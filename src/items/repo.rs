use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

use crate::items::model::{Category, ExpiryStatus, FoodItem, EXPIRING_SOON_WINDOW_DAYS};

/// Unfiltered per-user totals for the dashboard summary cards.
#[derive(Debug, Clone, Copy, FromRow, serde::Serialize)]
pub struct InventoryCounts {
    pub total: i64,
    pub expired: i64,
    pub expiring_soon: i64,
}

/// Translates a status filter into an inclusive expiry-date range.
/// `None` on either side means unbounded.
pub fn status_date_bounds(
    status: Option<ExpiryStatus>,
    today: Date,
) -> (Option<Date>, Option<Date>) {
    let window = time::Duration::days(EXPIRING_SOON_WINDOW_DAYS);
    match status {
        None => (None, None),
        Some(ExpiryStatus::Expired) => (None, Some(today - time::Duration::days(1))),
        Some(ExpiryStatus::ExpiringSoon) => (Some(today), Some(today + window)),
        Some(ExpiryStatus::Fresh) => (Some(today + window + time::Duration::days(1)), None),
    }
}

pub async fn list_for_user(
    db: &PgPool,
    user_id: Uuid,
    category: Option<Category>,
    status: Option<ExpiryStatus>,
    today: Date,
) -> anyhow::Result<Vec<FoodItem>> {
    let (from, to) = status_date_bounds(status, today);
    let rows = sqlx::query_as::<_, FoodItem>(
        r#"
        SELECT id, user_id, name, category, quantity, expiry_date, unit_cost, receipt_key, created_at
        FROM food_items
        WHERE user_id = $1
          AND ($2::text IS NULL OR category = $2)
          AND ($3::date IS NULL OR expiry_date >= $3)
          AND ($4::date IS NULL OR expiry_date <= $4)
        ORDER BY expiry_date ASC, created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(category.map(|c| c.as_str()))
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn counts_for_user(
    db: &PgPool,
    user_id: Uuid,
    today: Date,
) -> anyhow::Result<InventoryCounts> {
    let soon_end = today + time::Duration::days(EXPIRING_SOON_WINDOW_DAYS);
    let counts = sqlx::query_as::<_, InventoryCounts>(
        r#"
        SELECT count(*) AS total,
               count(*) FILTER (WHERE expiry_date < $2) AS expired,
               count(*) FILTER (WHERE expiry_date >= $2 AND expiry_date <= $3) AS expiring_soon
        FROM food_items
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(today)
    .bind(soon_end)
    .fetch_one(db)
    .await?;
    Ok(counts)
}

pub async fn get_owned(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
) -> anyhow::Result<Option<FoodItem>> {
    let item = sqlx::query_as::<_, FoodItem>(
        r#"
        SELECT id, user_id, name, category, quantity, expiry_date, unit_cost, receipt_key, created_at
        FROM food_items
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    category: Category,
    quantity: i32,
    expiry_date: Date,
    unit_cost: Option<f64>,
) -> anyhow::Result<FoodItem> {
    let item = sqlx::query_as::<_, FoodItem>(
        r#"
        INSERT INTO food_items (user_id, name, category, quantity, expiry_date, unit_cost)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, name, category, quantity, expiry_date, unit_cost, receipt_key, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(category)
    .bind(quantity)
    .bind(expiry_date)
    .bind(unit_cost)
    .fetch_one(db)
    .await?;
    Ok(item)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    name: &str,
    category: Category,
    quantity: i32,
    expiry_date: Date,
    unit_cost: Option<f64>,
) -> anyhow::Result<Option<FoodItem>> {
    let item = sqlx::query_as::<_, FoodItem>(
        r#"
        UPDATE food_items
        SET name = $3, category = $4, quantity = $5, expiry_date = $6, unit_cost = $7
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, name, category, quantity, expiry_date, unit_cost, receipt_key, created_at
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .bind(name)
    .bind(category)
    .bind(quantity)
    .bind(expiry_date)
    .bind(unit_cost)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

pub async fn delete(db: &PgPool, user_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM food_items
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_receipt_key(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    receipt_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE food_items
        SET receipt_key = $3
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .bind(receipt_key)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Distinct categories anywhere in the user's inventory.
pub async fn distinct_categories(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT category
        FROM food_items
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

/// Distinct categories among items whose expiry falls in [today, today + window].
pub async fn distinct_categories_expiring(
    db: &PgPool,
    user_id: Uuid,
    today: Date,
) -> anyhow::Result<Vec<String>> {
    let soon_end = today + time::Duration::days(EXPIRING_SOON_WINDOW_DAYS);
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT category
        FROM food_items
        WHERE user_id = $1 AND expiry_date >= $2 AND expiry_date <= $3
        "#,
    )
    .bind(user_id)
    .bind(today)
    .bind(soon_end)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn status_bounds_cover_the_window() {
        let today = date!(2025 - 06 - 15);

        assert_eq!(status_date_bounds(None, today), (None, None));
        assert_eq!(
            status_date_bounds(Some(ExpiryStatus::Expired), today),
            (None, Some(date!(2025 - 06 - 14)))
        );
        assert_eq!(
            status_date_bounds(Some(ExpiryStatus::ExpiringSoon), today),
            (Some(today), Some(date!(2025 - 06 - 18)))
        );
        assert_eq!(
            status_date_bounds(Some(ExpiryStatus::Fresh), today),
            (Some(date!(2025 - 06 - 19)), None)
        );
    }

    #[test]
    fn status_bounds_partition_dates() {
        // Every date lands in exactly one of the three ranges.
        let today = date!(2025 - 06 - 15);
        for delta in -30..30i64 {
            let d = today + time::Duration::days(delta);
            let mut hits = 0;
            for status in [
                ExpiryStatus::Expired,
                ExpiryStatus::ExpiringSoon,
                ExpiryStatus::Fresh,
            ] {
                let (from, to) = status_date_bounds(Some(status), today);
                let in_range =
                    from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t);
                if in_range {
                    hits += 1;
                }
            }
            assert_eq!(hits, 1, "date {d} matched {hits} status ranges");
        }
    }
}
