//! Live capture: the write side of the event store and recording registry.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{CaptionEvent, EventBus, HubEvent, MetadataEvent, Recording};
use crate::error::HubError;
use crate::persistence::{NewRecording, TimelineStore};

/// Records metadata, captions and recording boundaries while live, and
/// announces each write on the [`EventBus`].
#[derive(Debug, Clone)]
pub struct CaptureService {
    store: Arc<dyn TimelineStore>,
    event_bus: EventBus,
}

impl CaptureService {
    /// Creates a new `CaptureService`.
    #[must_use]
    pub fn new(store: Arc<dyn TimelineStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Appends a metadata value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidRequest`] for a blank key and
    /// [`HubError::StoreUnavailable`] on store failure.
    pub async fn record_metadata(&self, key: &str, value: &str) -> Result<MetadataEvent, HubError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(HubError::InvalidRequest("metadata key must not be empty".to_string()));
        }
        let event = self.store.insert_metadata(key, value).await?;
        tracing::info!(key, inserted_at = event.inserted_at, "metadata recorded");
        let _ = self.event_bus.publish(HubEvent::MetadataRecorded {
            event: event.clone(),
        });
        Ok(event)
    }

    /// Returns the current value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] on store failure.
    pub async fn latest_metadata(&self, key: &str) -> Result<Option<MetadataEvent>, HubError> {
        self.store.latest_metadata(key.trim()).await
    }

    /// Appends a caption that finished just now and lasted
    /// `duration_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidRequest`] for a negative or non-finite
    /// duration and [`HubError::StoreUnavailable`] on store failure.
    pub async fn record_caption(
        &self,
        text: &str,
        duration_seconds: f64,
    ) -> Result<CaptionEvent, HubError> {
        if !duration_seconds.is_finite() || duration_seconds < 0.0 {
            return Err(HubError::InvalidRequest(format!(
                "caption duration must be a non-negative number, got {duration_seconds}"
            )));
        }
        let caption = self.store.insert_caption(text, duration_seconds).await?;
        tracing::info!(duration_seconds, inserted_at = caption.inserted_at, "caption recorded");
        let _ = self.event_bus.publish(HubEvent::CaptionRecorded {
            caption: caption.clone(),
        });
        Ok(caption)
    }

    /// Closes any open recording and opens a new one starting now.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidRequest`] if any file location field is
    /// blank and [`HubError::StoreUnavailable`] on store failure.
    pub async fn start_recording(&self, new: NewRecording) -> Result<Recording, HubError> {
        for (field, value) in [
            ("file_base_name", &new.file_base_name),
            ("file_extension", &new.file_extension),
            ("directory", &new.directory),
        ] {
            if value.trim().is_empty() {
                return Err(HubError::InvalidRequest(format!("{field} must not be empty")));
            }
        }
        let recording = self.store.start_recording(new).await?;
        tracing::info!(recording_id = %recording.id, start_time = recording.start_time, "recording started");
        let _ = self.event_bus.publish(HubEvent::RecordingStarted {
            recording: recording.clone(),
        });
        Ok(recording)
    }

    /// Closes every open recording.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] on store failure.
    pub async fn end_recordings(&self) -> Result<u64, HubError> {
        let count = self.store.end_active_recordings().await?;
        tracing::info!(count, "recordings ended");
        let _ = self.event_bus.publish(HubEvent::RecordingsEnded {
            count,
            timestamp: Utc::now(),
        });
        Ok(count)
    }
}
