//! Hub error types with HTTP status code mapping.
//!
//! [`HubError`] is the central error type for the hub. Timeline
//! reconstruction, rendering, persistence and collaborator failures all
//! surface through it, and each variant maps to a specific HTTP status
//! code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RecordingId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "recording 7 is still open",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category             | HTTP Status                    |
/// |-----------|----------------------|--------------------------------|
/// | 1000–1999 | Validation           | 400 Bad Request                |
/// | 2000–2999 | State/Not Found      | 404 Not Found / 409 Conflict   |
/// | 3000–3999 | Server / Store       | 500 / 503                      |
/// | 4000–4999 | Timeline integrity   | 422 Unprocessable Entity       |
/// | 5000–5999 | External collaborator| 502 Bad Gateway                |
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Recording with the given ID was not found.
    #[error("recording not found: {0}")]
    RecordingNotFound(RecordingId),

    /// The recording has no end time, so its window is unbounded.
    #[error("recording {0} is still open")]
    RecordingNotClosed(RecordingId),

    /// No value has ever been recorded under the metadata key.
    #[error("no metadata recorded for key: {0}")]
    MetadataNotFound(String),

    /// An event selected for a recording window falls outside it.
    #[error("event at {inserted_at} lies outside recording window [{start}, {end}]")]
    EventOutsideWindow {
        /// Absolute time (Unix seconds) that violated the window.
        inserted_at: i64,
        /// Window start (Unix seconds).
        start: i64,
        /// Window end (Unix seconds).
        end: i64,
    },

    /// The event store or recording registry could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The video-hosting collaborator rejected or failed the upload.
    #[error("upload failed: {0}")]
    UploadFailed(String),

    /// The text-to-speech command failed.
    #[error("speech failed: {0}")]
    SpeechFailed(String),

    /// Filesystem failure at the publication boundary.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::RecordingNotFound(_) => 2001,
            Self::RecordingNotClosed(_) => 2002,
            Self::MetadataNotFound(_) => 2003,
            Self::Internal(_) => 3000,
            Self::StoreUnavailable(_) => 3001,
            Self::Io(_) => 3002,
            Self::EventOutsideWindow { .. } => 4001,
            Self::UploadFailed(_) => 5001,
            Self::SpeechFailed(_) => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RecordingNotFound(_) | Self::MetadataNotFound(_) => StatusCode::NOT_FOUND,
            Self::RecordingNotClosed(_) => StatusCode::CONFLICT,
            Self::EventOutsideWindow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UploadFailed(_) | Self::SpeechFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for HubError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
