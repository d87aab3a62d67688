//! Route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use lostfound_core::error::ValidationError;
use lostfound_core::{DeletedItem, Error, Item, ItemId, ItemStatus};

use crate::AppState;
use crate::error::{ApiError, json_error};
use crate::upload::{CreateItemForm, image_url};

/// Body of `PATCH /items/{id}/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Parse a path id. A malformed id cannot name a stored item.
fn parse_id(id: &str) -> Result<ItemId, ApiError> {
    ItemId::new(id).map_err(|_| Error::not_found(id).into())
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// GET /items
pub(crate) async fn handle_list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// POST /items
///
/// Required fields are checked before the image is stored, so a rejected
/// submission never leaves a file behind. If the record cannot be created
/// after the image was stored, the image is removed again.
pub(crate) async fn handle_create_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Item>, ApiError> {
    let form = CreateItemForm::from_multipart(multipart?).await?;

    let mut item = form.new_item();
    if item.is_missing_fields() {
        return Err(Error::from(ValidationError::MissingFields).into());
    }

    let stored = match form.image {
        Some(upload) => Some(state.media.store(upload).await?),
        None => None,
    };

    if let Some(media) = &stored {
        item = item.with_image_url(image_url(state.public_url.as_deref(), &headers, media));
    }

    match state.store.create(item).await {
        Ok(created) => Ok(Json(created)),
        Err(e) => {
            if let Some(media) = &stored
                && let Err(cleanup) = state.media.remove(media).await
            {
                warn!(%media, error = %cleanup, "Failed to remove orphaned image");
            }
            Err(e.into())
        }
    }
}

/// PATCH /items/{id}/status
///
/// The status value is checked before the id is looked up.
pub(crate) async fn handle_update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let raw = payload.ok().and_then(|Json(body)| body.status);
    let status: ItemStatus = match raw {
        Some(value) => value.parse()?,
        None => {
            return Err(Error::from(ValidationError::InvalidStatus {
                value: String::new(),
            })
            .into());
        }
    };

    let id = parse_id(&id)?;
    Ok(Json(state.store.update_status(&id, status).await?))
}

/// DELETE /items/{id}
pub(crate) async fn handle_delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedItem>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.delete(&id).await?))
}
