//! Recording handlers: lifecycle, timelines, preview and publish.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{StartRecordingRequest, StopRecordingsResponse, TimelineResponse};
use crate::app_state::AppState;
use crate::domain::{Recording, RecordingId};
use crate::error::{ErrorResponse, HubError};
use crate::service::{PublicationPackage, PublishOutcome};

/// `POST /recordings` — Open a new recording.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] if a file location field is blank.
#[utoipa::path(
    post,
    path = "/api/v1/recordings",
    tag = "Recordings",
    summary = "Start a recording",
    description = "Closes any open recording, then opens a new one starting now.",
    request_body = StartRecordingRequest,
    responses(
        (status = 201, description = "Recording opened", body = Recording),
        (status = 400, description = "Blank file location", body = ErrorResponse),
    )
)]
pub async fn start_recording(
    State(state): State<AppState>,
    Json(req): Json<StartRecordingRequest>,
) -> Result<impl IntoResponse, HubError> {
    let recording = state.capture.start_recording(req.into()).await?;
    Ok((StatusCode::CREATED, Json(recording)))
}

/// `POST /recordings/stop` — Close every open recording.
///
/// # Errors
///
/// Returns [`HubError::StoreUnavailable`] on store failure.
#[utoipa::path(
    post,
    path = "/api/v1/recordings/stop",
    tag = "Recordings",
    summary = "Stop recordings",
    responses(
        (status = 200, description = "Number of recordings closed", body = StopRecordingsResponse),
    )
)]
pub async fn stop_recordings(
    State(state): State<AppState>,
) -> Result<Json<StopRecordingsResponse>, HubError> {
    let ended = state.capture.end_recordings().await?;
    Ok(Json(StopRecordingsResponse { ended }))
}

/// `GET /recordings/pending` — Closed recordings not yet published.
///
/// # Errors
///
/// Returns [`HubError::StoreUnavailable`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/recordings/pending",
    tag = "Recordings",
    summary = "List pending recordings",
    description = "Closed recordings that have not been uploaded, oldest first.",
    responses(
        (status = 200, description = "Pending recordings", body = Vec<Recording>),
    )
)]
pub async fn pending_recordings(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recording>>, HubError> {
    Ok(Json(state.publish.pending().await?))
}

/// `GET /recordings/{id}` — Recording details.
///
/// # Errors
///
/// Returns [`HubError::RecordingNotFound`] if the recording does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/recordings/{id}",
    tag = "Recordings",
    summary = "Get a recording",
    params(
        ("id" = i64, Path, description = "Recording id"),
    ),
    responses(
        (status = 200, description = "Recording", body = Recording),
        (status = 404, description = "Recording not found", body = ErrorResponse),
    )
)]
pub async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<RecordingId>,
) -> Result<Json<Recording>, HubError> {
    Ok(Json(state.publish.recording(id).await?))
}

/// `GET /recordings/{id}/timeline/{key}` — Recording-relative timeline.
///
/// # Errors
///
/// Returns [`HubError::RecordingNotFound`] or
/// [`HubError::RecordingNotClosed`].
#[utoipa::path(
    get,
    path = "/api/v1/recordings/{id}/timeline/{key}",
    tag = "Recordings",
    summary = "Reconstruct a metadata timeline",
    description = "Every value of `key` in effect during the recording, with offsets from the recording start. The value carried in from before the recording has a negative offset.",
    params(
        ("id" = i64, Path, description = "Recording id"),
        ("key" = String, Path, description = "Metadata key"),
    ),
    responses(
        (status = 200, description = "Timeline", body = TimelineResponse),
        (status = 404, description = "Recording not found", body = ErrorResponse),
        (status = 409, description = "Recording still open", body = ErrorResponse),
    )
)]
pub async fn recording_timeline(
    State(state): State<AppState>,
    Path((id, key)): Path<(RecordingId, String)>,
) -> Result<Json<TimelineResponse>, HubError> {
    let entries = state.publish.timeline(id, &key).await?;
    Ok(Json(TimelineResponse {
        recording_id: id,
        key,
        entries,
    }))
}

/// `GET /recordings/{id}/preview` — Render without publishing.
///
/// # Errors
///
/// Returns [`HubError::RecordingNotFound`] or
/// [`HubError::RecordingNotClosed`].
#[utoipa::path(
    get,
    path = "/api/v1/recordings/{id}/preview",
    tag = "Recordings",
    summary = "Preview the publication package",
    description = "Renders title, description, subtitles and tags exactly as a publish would, without side effects.",
    params(
        ("id" = i64, Path, description = "Recording id"),
    ),
    responses(
        (status = 200, description = "Rendered package", body = PublicationPackage),
        (status = 404, description = "Recording not found", body = ErrorResponse),
        (status = 409, description = "Recording still open", body = ErrorResponse),
    )
)]
pub async fn preview_recording(
    State(state): State<AppState>,
    Path(id): Path<RecordingId>,
) -> Result<Json<PublicationPackage>, HubError> {
    Ok(Json(state.publish.prepare(id).await?))
}

/// `POST /recordings/{id}/publish` — Render, upload and mark uploaded.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] if already uploaded,
/// [`HubError::UploadFailed`] if the uploader fails, or any preview error.
#[utoipa::path(
    post,
    path = "/api/v1/recordings/{id}/publish",
    tag = "Recordings",
    summary = "Publish a recording",
    description = "Writes the subtitle document next to the video, uploads both, and marks the recording uploaded. On any failure the recording stays pending.",
    params(
        ("id" = i64, Path, description = "Recording id"),
    ),
    responses(
        (status = 200, description = "Published", body = PublishOutcome),
        (status = 400, description = "Already uploaded", body = ErrorResponse),
        (status = 404, description = "Recording not found", body = ErrorResponse),
        (status = 409, description = "Recording still open", body = ErrorResponse),
        (status = 502, description = "Upload failed", body = ErrorResponse),
    )
)]
pub async fn publish_recording(
    State(state): State<AppState>,
    Path(id): Path<RecordingId>,
) -> Result<Json<PublishOutcome>, HubError> {
    Ok(Json(state.publish.publish(id).await?))
}

/// Recording routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recordings", post(start_recording))
        .route("/recordings/stop", post(stop_recordings))
        .route("/recordings/pending", get(pending_recordings))
        .route("/recordings/{id}", get(get_recording))
        .route("/recordings/{id}/timeline/{key}", get(recording_timeline))
        .route("/recordings/{id}/preview", get(preview_recording))
        .route("/recordings/{id}/publish", post(publish_recording))
}
