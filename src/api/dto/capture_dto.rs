//! Metadata and caption DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /metadata`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordMetadataRequest {
    /// Metadata key, e.g. `"task"` or `"title"`.
    pub key: String,
    /// Value, stored verbatim.
    pub value: String,
}

/// Request body for `POST /captions`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordCaptionRequest {
    /// Spoken text.
    pub text: String,
    /// How long the caption was on screen, in seconds.
    pub duration_seconds: f64,
}
