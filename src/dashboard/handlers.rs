use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::services::AuthUser;
use crate::dashboard::services::{self, DashboardView};
use crate::error::AppError;
use crate::items::dto::ItemFilter;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<DashboardView>, AppError> {
    let view = services::aggregate(&state.db, user_id, &filter).await?;
    Ok(Json(view))
}
