use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::services::AuthUser;
use crate::consumption::model::ConsumptionLog;
use crate::consumption::repo;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items/:id/consume", post(consume_item))
        .route("/consumption", get(list_consumption))
}

#[instrument(skip(state))]
pub async fn consume_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ConsumptionLog>), AppError> {
    let log = repo::consume(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("item"))?;
    info!(%user_id, item_id = %id, log_id = %log.id, "consumption logged");
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn list_consumption(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ConsumptionLog>>, AppError> {
    let logs = repo::list_for_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(logs))
}
