//! Recording sessions tracked by the registry.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordingId;
use crate::error::HubError;

/// A recording session.
///
/// A recording with `end_time = None` is open. `end_time`, when present,
/// is never earlier than `start_time`. `uploaded` flips to `true` once,
/// after a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recording {
    /// Registry id.
    pub id: RecordingId,
    /// File name without extension, e.g. `2024-03-01T18:00:00Z`.
    pub file_base_name: String,
    /// Video file extension without the dot, e.g. `mkv`.
    pub file_extension: String,
    /// Directory the broadcasting app writes the recording into.
    pub directory: String,
    /// Start time in Unix seconds.
    pub start_time: i64,
    /// End time in Unix seconds; `None` while recording.
    pub end_time: Option<i64>,
    /// Whether the recording has been published.
    pub uploaded: bool,
    /// Row insert time in Unix seconds.
    pub inserted_at: i64,
}

/// The closed `[start, end]` window of a finished recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingWindow {
    /// Window start in Unix seconds (inclusive).
    pub start: i64,
    /// Window end in Unix seconds (inclusive).
    pub end: i64,
}

impl RecordingWindow {
    /// Returns `true` if `at` lies within the window, both ends inclusive.
    #[must_use]
    pub const fn contains(&self, at: i64) -> bool {
        self.start <= at && at <= self.end
    }

    /// Window length in seconds.
    #[must_use]
    pub const fn length(&self) -> i64 {
        self.end - self.start
    }

    /// Converts an absolute time into a recording-relative offset.
    #[must_use]
    pub const fn offset_of(&self, at: i64) -> i64 {
        at - self.start
    }

    /// Builds the error reported when `at` violates this window.
    #[must_use]
    pub fn violation(&self, at: i64) -> HubError {
        HubError::EventOutsideWindow {
            inserted_at: at,
            start: self.start,
            end: self.end,
        }
    }
}

impl Recording {
    /// Returns `true` while the recording has no end time.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Returns the closed window of this recording.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::RecordingNotClosed`] if the recording is still
    /// open, and [`HubError::EventOutsideWindow`] if the stored end time
    /// precedes the start time.
    pub fn window(&self) -> Result<RecordingWindow, HubError> {
        let end = self.end_time.ok_or(HubError::RecordingNotClosed(self.id))?;
        if end < self.start_time {
            return Err(HubError::EventOutsideWindow {
                inserted_at: end,
                start: self.start_time,
                end,
            });
        }
        Ok(RecordingWindow {
            start: self.start_time,
            end,
        })
    }

    /// Path of the recorded video file.
    #[must_use]
    pub fn video_path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(format!(
            "{}.{}",
            self.file_base_name, self.file_extension
        ))
    }

    /// Path the rendered subtitle document is written to.
    #[must_use]
    pub fn subtitle_path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(format!("{}.srt", self.file_base_name))
    }

    /// Start time as an RFC 3339 / ISO 8601 UTC string, second precision.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Internal`] if the start time is outside the
    /// range chrono can represent.
    pub fn start_time_iso8601(&self) -> Result<String, HubError> {
        DateTime::<Utc>::from_timestamp(self.start_time, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .ok_or_else(|| {
                HubError::Internal(format!("start time {} out of range", self.start_time))
            })
    }
}
