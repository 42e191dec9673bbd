use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::consumption::model::{consume_outcome, ConsumeOutcome, ConsumptionLog};
use crate::items::model::FoodItem;

/// Consumes one unit of an owned item: snapshots it into a log row, then
/// either decrements the quantity or deletes the row when the last unit goes.
/// Both writes happen in one transaction; the `FOR UPDATE` lock serializes
/// same-user races on the item row. Returns `None` without mutating anything
/// when the item does not exist or belongs to someone else.
pub async fn consume(
    db: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
) -> anyhow::Result<Option<ConsumptionLog>> {
    let mut tx = db.begin().await.context("begin tx")?;

    let item = sqlx::query_as::<_, FoodItem>(
        r#"
        SELECT id, user_id, name, category, quantity, expiry_date, unit_cost, receipt_key, created_at
        FROM food_items
        WHERE id = $1 AND user_id = $2
        FOR UPDATE
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(item) = item else {
        return Ok(None);
    };

    let mut log = sqlx::query_as::<_, ConsumptionLog>(
        r#"
        INSERT INTO consumption_logs (user_id, food_item_id, food_name, food_category, quantity)
        VALUES ($1, $2, $3, $4, 1)
        RETURNING id, user_id, food_item_id, food_name, food_category, quantity, consumed_at
        "#,
    )
    .bind(user_id)
    .bind(item.id)
    .bind(&item.name)
    .bind(item.category.as_str())
    .fetch_one(&mut *tx)
    .await
    .context("insert consumption log")?;

    match consume_outcome(item.quantity) {
        ConsumeOutcome::Decremented(remaining) => {
            sqlx::query(
                r#"
                UPDATE food_items SET quantity = $3 WHERE id = $1 AND user_id = $2
                "#,
            )
            .bind(item.id)
            .bind(user_id)
            .bind(remaining)
            .execute(&mut *tx)
            .await
            .context("decrement item")?;
        }
        ConsumeOutcome::Depleted => {
            sqlx::query(
                r#"
                DELETE FROM food_items WHERE id = $1 AND user_id = $2
                "#,
            )
            .bind(item.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("delete depleted item")?;
            // ON DELETE SET NULL already cleared the reference in the database.
            log.food_item_id = None;
        }
    }

    tx.commit().await.context("commit tx")?;
    Ok(Some(log))
}

pub async fn list_for_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<ConsumptionLog>> {
    let rows = sqlx::query_as::<_, ConsumptionLog>(
        r#"
        SELECT id, user_id, food_item_id, food_name, food_category, quantity, consumed_at
        FROM consumption_logs
        WHERE user_id = $1
        ORDER BY consumed_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::items::model::{today, Category};
    use crate::items::repo as items_repo;
    use crate::test_support::{seed_user, test_pool};
    use sqlx::PgPool;

    async fn log_count(db: &PgPool, user_id: Uuid) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT count(*) FROM consumption_logs WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await
            .expect("count logs");
        n
    }

    #[tokio::test]
    async fn consuming_the_last_unit_deletes_item_and_logs_once() {
        let Some(db) = test_pool().await else { return };
        let user_id = seed_user(&db).await;
        let expiry = today() + time::Duration::days(2);
        let item = items_repo::insert(&db, user_id, "Doi", Category::Dairy, 1, expiry, None)
            .await
            .expect("insert item");

        let log = consume(&db, user_id, item.id)
            .await
            .expect("consume")
            .expect("item exists");
        assert_eq!(log.quantity, 1);
        assert_eq!(log.food_name, "Doi");
        assert_eq!(log.food_category, "Dairy");
        assert_eq!(log.food_item_id, None);

        let gone = items_repo::get_owned(&db, user_id, item.id)
            .await
            .expect("lookup");
        assert!(gone.is_none());
        assert_eq!(log_count(&db, user_id).await, 1);

        // A second attempt finds nothing and must not add a log.
        let again = consume(&db, user_id, item.id).await.expect("consume again");
        assert!(again.is_none());
        assert_eq!(log_count(&db, user_id).await, 1);
    }

    #[tokio::test]
    async fn consume_decrements_until_depleted() {
        let Some(db) = test_pool().await else { return };
        let user_id = seed_user(&db).await;
        let expiry = today() + time::Duration::days(10);
        let item = items_repo::insert(&db, user_id, "Chal", Category::Grains, 3, expiry, None)
            .await
            .expect("insert item");

        let first = consume(&db, user_id, item.id)
            .await
            .expect("consume")
            .expect("item exists");
        assert_eq!(first.food_item_id, Some(item.id));

        let remaining = items_repo::get_owned(&db, user_id, item.id)
            .await
            .expect("lookup")
            .expect("item survives");
        assert_eq!(remaining.quantity, 2);

        for _ in 0..2 {
            consume(&db, user_id, item.id)
                .await
                .expect("consume")
                .expect("item exists");
        }
        assert!(items_repo::get_owned(&db, user_id, item.id)
            .await
            .expect("lookup")
            .is_none());
        assert_eq!(log_count(&db, user_id).await, 3);

        assert!(consume(&db, user_id, item.id)
            .await
            .expect("consume past depletion")
            .is_none());
        assert_eq!(log_count(&db, user_id).await, 3);
    }

    #[tokio::test]
    async fn consume_rejects_items_owned_by_others() {
        let Some(db) = test_pool().await else { return };
        let owner = seed_user(&db).await;
        let intruder = seed_user(&db).await;
        let expiry = today() + time::Duration::days(1);
        let item = items_repo::insert(&db, owner, "Kola", Category::Fruits, 2, expiry, None)
            .await
            .expect("insert item");

        let denied = consume(&db, intruder, item.id).await.expect("consume");
        assert!(denied.is_none());
        assert_eq!(log_count(&db, intruder).await, 0);

        let untouched = items_repo::get_owned(&db, owner, item.id)
            .await
            .expect("lookup")
            .expect("item untouched");
        assert_eq!(untouched.quantity, 2);
    }
}
