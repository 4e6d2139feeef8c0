//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1` except `/health`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "stream-hub",
        description = "Records the metadata and caption timeline of a live broadcast and packages finished recordings for publication."
    ),
    paths(
        handlers::capture::record_metadata,
        handlers::capture::latest_metadata,
        handlers::capture::record_caption,
        handlers::recording::start_recording,
        handlers::recording::stop_recordings,
        handlers::recording::pending_recordings,
        handlers::recording::get_recording,
        handlers::recording::recording_timeline,
        handlers::recording::preview_recording,
        handlers::recording::publish_recording,
        handlers::speech::speak,
        handlers::speech::speech_status,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Capture", description = "Live metadata and caption writes"),
        (name = "Recordings", description = "Recording lifecycle and publication"),
        (name = "Speech", description = "Text-to-speech"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
