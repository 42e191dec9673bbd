use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use anyhow::Context;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::services::AuthUser;
use crate::error::AppError;
use crate::items::dto::{ItemFilter, ItemRequest, ItemView};
use crate::items::model;
use crate::items::repo;
use crate::state::AppState;

const RECEIPT_URL_TTL: std::time::Duration = std::time::Duration::from_secs(600);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route(
            "/items/:id/receipt",
            post(upload_receipt).get(get_receipt).layer(DefaultBodyLimit::max(5 * 1024 * 1024)),
        )
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<Vec<ItemView>>, AppError> {
    let today = model::today();
    let items = repo::list_for_user(
        &state.db,
        user_id,
        filter.category(),
        filter.status(),
        today,
    )
    .await?;
    let views = items
        .into_iter()
        .map(|i| ItemView::from_item(i, today))
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ItemRequest>,
) -> Result<(StatusCode, Json<ItemView>), AppError> {
    let category = payload.validate()?;
    let item = repo::insert(
        &state.db,
        user_id,
        payload.name.trim(),
        category,
        payload.quantity,
        payload.expiry_date,
        payload.unit_cost,
    )
    .await?;
    info!(%user_id, item_id = %item.id, "item created");
    Ok((
        StatusCode::CREATED,
        Json(ItemView::from_item(item, model::today())),
    ))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemView>, AppError> {
    let item = repo::get_owned(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("item"))?;
    Ok(Json(ItemView::from_item(item, model::today())))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemRequest>,
) -> Result<Json<ItemView>, AppError> {
    let category = payload.validate()?;
    let item = repo::update(
        &state.db,
        user_id,
        id,
        payload.name.trim(),
        category,
        payload.quantity,
        payload.expiry_date,
        payload.unit_cost,
    )
    .await?
    .ok_or(AppError::NotFound("item"))?;
    info!(%user_id, item_id = %item.id, "item updated");
    Ok(Json(ItemView::from_item(item, model::today())))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let item = repo::get_owned(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("item"))?;

    if !repo::delete(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("item"));
    }
    if let Some(key) = item.receipt_key {
        if let Err(e) = state.storage.delete(&key).await {
            warn!(error = %e, %key, "failed to delete receipt object");
        }
    }
    info!(%user_id, item_id = %id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Accepts one multipart `file` field holding the receipt image. The stored
/// key is opaque to the rest of the application.
#[instrument(skip(state, mp))]
pub async fn upload_receipt(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<StatusCode, AppError> {
    let item = repo::get_owned(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("item"))?;

    let mut upload = None;
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field
                .bytes()
                .await
                .context("read multipart field")
                .map_err(AppError::Internal)?;
            upload = Some((data, content_type));
        }
    }
    let (body, content_type) =
        upload.ok_or_else(|| AppError::validation("multipart field 'file' is required"))?;
    let ext = ext_from_mime(&content_type)
        .ok_or_else(|| AppError::validation(format!("unsupported image type '{content_type}'")))?;

    let key = format!("receipts/{}/{}-{}.{}", user_id, id, Uuid::new_v4(), ext);
    state
        .storage
        .put(&key, body, &content_type)
        .await
        .with_context(|| format!("store receipt {key}"))
        .map_err(AppError::Internal)?;

    if !repo::set_receipt_key(&state.db, user_id, id, &key).await? {
        return Err(AppError::NotFound("item"));
    }
    // Replacing a receipt leaves the old object behind; clean it up.
    if let Some(old) = item.receipt_key {
        if let Err(e) = state.storage.delete(&old).await {
            warn!(error = %e, key = %old, "failed to delete replaced receipt");
        }
    }
    info!(%user_id, item_id = %id, %key, "receipt uploaded");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_receipt(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    let item = repo::get_owned(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("item"))?;
    let key = item.receipt_key.ok_or(AppError::NotFound("receipt"))?;
    let url = state
        .storage
        .presigned_url(&key, RECEIPT_URL_TTL)
        .await
        .map_err(AppError::Internal)?;
    Ok(Redirect::temporary(&url))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
