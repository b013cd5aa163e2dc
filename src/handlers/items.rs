//! CRUD handlers for the item catalog.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::ApiError;
use crate::router::AppState;
use crate::store::{Item, ItemPatch};
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
}

/// POST /items
pub async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    validate::item_name(&body.name)?;
    validate::item_price(body.price)?;
    let item = state.items.create(&body.name, body.price).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items
///
/// Unpaginated. Fine for a small catalog; a large one needs limits before
/// this endpoint destabilizes the server or the database.
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.items.list().await?))
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    match state.items.get(id).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::NotFound("item")),
    }
}

/// PATCH /items/{id} — supplied fields replace existing values, omitted
/// fields are left untouched.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<Item>, ApiError> {
    if let Some(name) = patch.name.as_deref() {
        validate::item_name(name)?;
    }
    if let Some(price) = patch.price {
        validate::item_price(price)?;
    }
    match state.items.update(id, patch).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::NotFound("item")),
    }
}

/// DELETE /items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.items.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("item"))
    }
}
