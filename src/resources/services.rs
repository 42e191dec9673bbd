use rand::seq::SliceRandom;
use rand::thread_rng;
use sqlx::PgPool;
use std::collections::HashSet;
use time::Date;
use uuid::Uuid;

use crate::items;
use crate::resources::model::{Resource, ResourceType};
use crate::resources::repo;

/// Cap on each recommendation tier.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Rescue tier: recipe-typed candidates only, sampled without a defined
/// order, capped at [`MAX_RECOMMENDATIONS`].
pub fn pick_rescue(mut candidates: Vec<Resource>) -> Vec<Resource> {
    candidates.retain(|r| r.resource_type == ResourceType::Recipe);
    candidates.shuffle(&mut thread_rng());
    candidates.truncate(MAX_RECOMMENDATIONS);
    candidates
}

/// General tier: anything already surfaced in the rescue tier is excluded by
/// identity, whatever its category match.
pub fn pick_general(mut candidates: Vec<Resource>, rescue: &[Resource]) -> Vec<Resource> {
    let taken: HashSet<Uuid> = rescue.iter().map(|r| r.id).collect();
    candidates.retain(|r| !taken.contains(&r.id));
    candidates.shuffle(&mut thread_rng());
    candidates.truncate(MAX_RECOMMENDATIONS);
    candidates
}

/// Two-tier recommendation for one user's dashboard: rescue recipes for
/// categories expiring within the soon-window, then general matches for the
/// whole inventory. A user with no items gets two empty sets.
pub async fn recommend_for_user(
    db: &PgPool,
    user_id: Uuid,
    today: Date,
) -> anyhow::Result<(Vec<Resource>, Vec<Resource>)> {
    let expiring_categories = items::repo::distinct_categories_expiring(db, user_id, today).await?;
    let rescue = if expiring_categories.is_empty() {
        Vec::new()
    } else {
        pick_rescue(repo::recipes_in_categories(db, &expiring_categories).await?)
    };

    let all_categories = items::repo::distinct_categories(db, user_id).await?;
    let general = if all_categories.is_empty() {
        Vec::new()
    } else {
        pick_general(repo::in_categories(db, &all_categories).await?, &rescue)
    };

    Ok((rescue, general))
}
