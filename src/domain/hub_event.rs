//! Live events broadcast to overlay and control-panel clients.
//!
//! Every write to the event store or recording registry emits a
//! [`HubEvent`] through the [`super::EventBus`]. Events are fire-and-forget:
//! they are never persisted and a lagging client simply misses some.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{CaptionEvent, MetadataEvent, Recording, RecordingId};

/// Domain event emitted after every hub mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum HubEvent {
    /// A metadata value was recorded.
    MetadataRecorded {
        /// The stored event.
        event: MetadataEvent,
    },

    /// A caption was recorded.
    CaptionRecorded {
        /// The stored caption.
        caption: CaptionEvent,
    },

    /// A new recording was opened.
    RecordingStarted {
        /// The new recording.
        recording: Recording,
    },

    /// All open recordings were closed.
    RecordingsEnded {
        /// Number of recordings closed.
        count: u64,
        /// Close timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A recording was handed to the video platform.
    RecordingPublished {
        /// Published recording.
        recording_id: RecordingId,
        /// Platform video id.
        video_id: String,
        /// Publish timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Text-to-speech started.
    SpeechStarted {
        /// Text being spoken.
        text: String,
        /// Start timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Text-to-speech finished.
    SpeechFinished {
        /// Whether the speech command succeeded.
        success: bool,
        /// Finish timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl HubEvent {
    /// Every event type name, in declaration order.
    pub const TYPES: [&'static str; 7] = [
        "metadata_recorded",
        "caption_recorded",
        "recording_started",
        "recordings_ended",
        "recording_published",
        "speech_started",
        "speech_finished",
    ];

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::MetadataRecorded { .. } => "metadata_recorded",
            Self::CaptionRecorded { .. } => "caption_recorded",
            Self::RecordingStarted { .. } => "recording_started",
            Self::RecordingsEnded { .. } => "recordings_ended",
            Self::RecordingPublished { .. } => "recording_published",
            Self::SpeechStarted { .. } => "speech_started",
            Self::SpeechFinished { .. } => "speech_finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_event_serializes_with_tag() {
        let event = HubEvent::MetadataRecorded {
            event: MetadataEvent {
                id: 3,
                key: "task".to_string(),
                value: "refactor parser".to_string(),
                inserted_at: 1_000,
            },
        };
        assert_eq!(event.event_type_str(), "metadata_recorded");
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"metadata_recorded\""));
        assert!(json.contains("refactor parser"));
    }

    #[test]
    fn type_string_matches_serde_tag() {
        let event = HubEvent::SpeechFinished {
            success: true,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            value.get("event_type").and_then(|v| v.as_str()),
            Some(event.event_type_str())
        );
    }
}
