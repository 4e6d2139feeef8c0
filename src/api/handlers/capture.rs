//! Live capture handlers: metadata and captions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{RecordCaptionRequest, RecordMetadataRequest};
use crate::app_state::AppState;
use crate::domain::{CaptionEvent, MetadataEvent};
use crate::error::{ErrorResponse, HubError};

/// `POST /metadata` — Record a metadata value.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] for a blank key.
#[utoipa::path(
    post,
    path = "/api/v1/metadata",
    tag = "Capture",
    summary = "Record a metadata value",
    description = "Appends a value under a metadata key (task, category, title, description, tags). The hub stamps the insert time.",
    request_body = RecordMetadataRequest,
    responses(
        (status = 201, description = "Metadata recorded", body = MetadataEvent),
        (status = 400, description = "Blank key", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn record_metadata(
    State(state): State<AppState>,
    Json(req): Json<RecordMetadataRequest>,
) -> Result<impl IntoResponse, HubError> {
    let event = state.capture.record_metadata(&req.key, &req.value).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /metadata/{key}/latest` — Current value of a key.
///
/// # Errors
///
/// Returns [`HubError::MetadataNotFound`] if nothing was recorded under
/// the key.
#[utoipa::path(
    get,
    path = "/api/v1/metadata/{key}/latest",
    tag = "Capture",
    summary = "Latest metadata value",
    params(
        ("key" = String, Path, description = "Metadata key"),
    ),
    responses(
        (status = 200, description = "Most recent value", body = MetadataEvent),
        (status = 404, description = "Nothing recorded under key", body = ErrorResponse),
    )
)]
pub async fn latest_metadata(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MetadataEvent>, HubError> {
    state
        .capture
        .latest_metadata(&key)
        .await?
        .map(Json)
        .ok_or(HubError::MetadataNotFound(key))
}

/// `POST /captions` — Record a caption that just finished.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] for a negative or non-finite
/// duration.
#[utoipa::path(
    post,
    path = "/api/v1/captions",
    tag = "Capture",
    summary = "Record a caption",
    description = "Appends a caption whose display ended now and lasted `duration_seconds`.",
    request_body = RecordCaptionRequest,
    responses(
        (status = 201, description = "Caption recorded", body = CaptionEvent),
        (status = 400, description = "Invalid duration", body = ErrorResponse),
    )
)]
pub async fn record_caption(
    State(state): State<AppState>,
    Json(req): Json<RecordCaptionRequest>,
) -> Result<impl IntoResponse, HubError> {
    let caption = state
        .capture
        .record_caption(&req.text, req.duration_seconds)
        .await?;
    Ok((StatusCode::CREATED, Json(caption)))
}

/// Capture routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metadata", post(record_metadata))
        .route("/metadata/{key}/latest", get(latest_metadata))
        .route("/captions", post(record_caption))
}
