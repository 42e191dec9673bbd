use sqlx::PgPool;

use crate::items::model::Category;
use crate::resources::model::{Resource, ResourceType};

pub async fn list(
    db: &PgPool,
    category: Option<Category>,
    resource_type: Option<ResourceType>,
) -> anyhow::Result<Vec<Resource>> {
    let rows = sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, title, description, url, category, resource_type
        FROM resources
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::text IS NULL OR resource_type = $2)
        ORDER BY title ASC
        "#,
    )
    .bind(category.map(|c| c.as_str()))
    .bind(resource_type.map(|t| t.as_str()))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Recipe-typed resources whose category is in the given set.
pub async fn recipes_in_categories(
    db: &PgPool,
    categories: &[String],
) -> anyhow::Result<Vec<Resource>> {
    let rows = sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, title, description, url, category, resource_type
        FROM resources
        WHERE category = ANY($1) AND resource_type = 'Recipe'
        "#,
    )
    .bind(categories)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Resources of any type whose category is in the given set.
pub async fn in_categories(db: &PgPool, categories: &[String]) -> anyhow::Result<Vec<Resource>> {
    let rows = sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, title, description, url, category, resource_type
        FROM resources
        WHERE category = ANY($1)
        "#,
    )
    .bind(categories)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
