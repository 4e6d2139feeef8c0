//! Recording DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{RecordingId, RelativeMetadataEvent};
use crate::persistence::NewRecording;

/// Request body for `POST /recordings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartRecordingRequest {
    /// File name without extension.
    pub file_base_name: String,
    /// Extension without the dot, e.g. `"mkv"`.
    pub file_extension: String,
    /// Directory holding the file.
    pub directory: String,
}

impl From<StartRecordingRequest> for NewRecording {
    fn from(req: StartRecordingRequest) -> Self {
        Self {
            file_base_name: req.file_base_name,
            file_extension: req.file_extension,
            directory: req.directory,
        }
    }
}

/// Response body for `POST /recordings/stop`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StopRecordingsResponse {
    /// Number of recordings closed.
    pub ended: u64,
}

/// Response body for `GET /recordings/{id}/timeline/{key}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimelineResponse {
    /// Recording the timeline is relative to.
    pub recording_id: RecordingId,
    /// Metadata key.
    pub key: String,
    /// Entries in chronological order. A carried-forward entry has a
    /// negative offset.
    pub entries: Vec<RelativeMetadataEvent>,
}
