use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::auth::services::AuthUser;
use crate::error::AppError;
use crate::items::model::Category;
use crate::resources::model::{Resource, ResourceType};
use crate::resources::repo;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ResourceFilter {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

impl ResourceFilter {
    fn category(&self) -> Option<Category> {
        self.category.as_deref().and_then(|s| s.parse().ok())
    }

    fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type.as_deref().and_then(|s| s.parse().ok())
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/resources", get(list_resources))
}

#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(filter): Query<ResourceFilter>,
) -> Result<Json<Vec<Resource>>, AppError> {
    let resources = repo::list(&state.db, filter.category(), filter.resource_type()).await?;
    Ok(Json(resources))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_filter_values_are_ignored() {
        let f = ResourceFilter {
            category: Some("Gadgets".into()),
            resource_type: Some("Podcast".into()),
        };
        assert_eq!(f.category(), None);
        assert_eq!(f.resource_type(), None);

        let f = ResourceFilter {
            category: Some("Grains".into()),
            resource_type: Some("recipe".into()),
        };
        assert_eq!(f.category(), Some(Category::Grains));
        assert_eq!(f.resource_type(), Some(ResourceType::Recipe));
    }
}
