use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::consumption::model::ConsumptionLog;
use crate::items::dto::{ItemFilter, ItemView};
use crate::items::model;
use crate::items::repo::{self as items_repo, InventoryCounts};
use crate::resources::model::Resource;
use crate::resources::services as recommend;

/// How many recent consumption logs the dashboard shows.
const RECENT_LOGS: i64 = 3;

/// Everything one dashboard render needs. Recomputed per request; nothing
/// here is stored.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub items: Vec<ItemView>,
    pub counts: InventoryCounts,
    pub rescue_resources: Vec<Resource>,
    pub general_resources: Vec<Resource>,
    pub recent_consumption: Vec<ConsumptionLog>,
}

/// Composes the dashboard for one user: the filtered item table, unfiltered
/// summary counts (stable while the table is filtered), both recommendation
/// tiers, and the most recent consumption logs.
pub async fn aggregate(
    db: &PgPool,
    user_id: Uuid,
    filter: &ItemFilter,
) -> anyhow::Result<DashboardView> {
    let today = model::today();

    let items = items_repo::list_for_user(db, user_id, filter.category(), filter.status(), today)
        .await?
        .into_iter()
        .map(|i| ItemView::from_item(i, today))
        .collect();

    let counts = items_repo::counts_for_user(db, user_id, today).await?;
    let (rescue_resources, general_resources) =
        recommend::recommend_for_user(db, user_id, today).await?;
    let recent_consumption =
        crate::consumption::repo::list_for_user(db, user_id, RECENT_LOGS, 0).await?;

    Ok(DashboardView {
        items,
        counts,
        rescue_resources,
        general_resources,
        recent_consumption,
    })
}
