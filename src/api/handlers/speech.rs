//! Text-to-speech handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{SpeakRequest, SpeechStatusResponse};
use crate::app_state::AppState;
use crate::domain::CaptionEvent;
use crate::error::{ErrorResponse, HubError};

/// `POST /speech` — Speak text aloud and caption it.
///
/// # Errors
///
/// Returns [`HubError::InvalidRequest`] for blank text or while already
/// speaking, and [`HubError::SpeechFailed`] if the TTS command fails.
#[utoipa::path(
    post,
    path = "/api/v1/speech",
    tag = "Speech",
    summary = "Speak text",
    description = "Runs the configured text-to-speech command and records the text as a caption lasting as long as the speech.",
    request_body = SpeakRequest,
    responses(
        (status = 201, description = "Spoken and captioned", body = CaptionEvent),
        (status = 400, description = "Blank text or already speaking", body = ErrorResponse),
        (status = 502, description = "Speech command failed", body = ErrorResponse),
    )
)]
pub async fn speak(
    State(state): State<AppState>,
    Json(req): Json<SpeakRequest>,
) -> Result<impl IntoResponse, HubError> {
    let caption = state.speech.speak(&req.text).await?;
    Ok((StatusCode::CREATED, Json(caption)))
}

/// `GET /speech/status` — 200 while speaking, 404 otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/speech/status",
    tag = "Speech",
    summary = "Speaking indicator",
    description = "Polled by the avatar overlay. Answers 200 while speech is in flight and 404 when idle.",
    responses(
        (status = 200, description = "Speaking", body = SpeechStatusResponse),
        (status = 404, description = "Idle", body = SpeechStatusResponse),
    )
)]
pub async fn speech_status(State(state): State<AppState>) -> impl IntoResponse {
    let speaking = state.speech.status().is_speaking();
    let status = if speaking {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(SpeechStatusResponse { speaking }))
}

/// Speech routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/speech", post(speak))
        .route("/speech/status", get(speech_status))
}
