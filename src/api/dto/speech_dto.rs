//! Speech DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /speech`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SpeakRequest {
    /// Text to speak.
    pub text: String,
}

/// Response body for `GET /speech/status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SpeechStatusResponse {
    /// Whether speech is in flight.
    pub speaking: bool,
}
