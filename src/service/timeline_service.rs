//! Timeline reconstruction: store queries plus window placement.

use std::sync::Arc;

use crate::domain::timeline::{place_captions, place_metadata};
use crate::domain::{Recording, RelativeCaption, RelativeMetadataEvent};
use crate::error::HubError;
use crate::persistence::TimelineStore;

/// Rebuilds recording-relative timelines from the event store.
///
/// Read-only: every call re-queries the store and nothing is cached, so
/// two calls against an unchanged store return identical timelines.
#[derive(Debug, Clone)]
pub struct TimelineReconstructor {
    store: Arc<dyn TimelineStore>,
}

impl TimelineReconstructor {
    /// Creates a reconstructor reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TimelineStore>) -> Self {
        Self { store }
    }

    /// Reconstructs the timeline of one metadata key for a closed
    /// recording, including the value carried forward from before it
    /// started.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::RecordingNotClosed`] for an open recording,
    /// [`HubError::EventOutsideWindow`] if the store hands back an event
    /// outside the window, and [`HubError::StoreUnavailable`] on store
    /// failure.
    pub async fn reconstruct_metadata(
        &self,
        recording: &Recording,
        key: &str,
    ) -> Result<Vec<RelativeMetadataEvent>, HubError> {
        let window = recording.window()?;
        let (carried, in_window) = tokio::try_join!(
            self.store.latest_metadata_before(key, window.start),
            self.store.metadata_in_range(key, window.start, window.end),
        )?;
        let timeline = place_metadata(window, carried, in_window)?;
        tracing::debug!(recording_id = %recording.id, key, count = timeline.len(), "metadata timeline rebuilt");
        Ok(timeline)
    }

    /// Reconstructs the caption timeline of a closed recording.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::RecordingNotClosed`] for an open recording,
    /// [`HubError::EventOutsideWindow`] for a caption whose speech started
    /// before the recording or ended after it, and
    /// [`HubError::StoreUnavailable`] on store failure.
    pub async fn reconstruct_captions(
        &self,
        recording: &Recording,
    ) -> Result<Vec<RelativeCaption>, HubError> {
        let window = recording.window()?;
        let captions = self.store.captions_in_range(window.start, window.end).await?;
        let timeline = place_captions(window, captions)?;
        tracing::debug!(recording_id = %recording.id, count = timeline.len(), "caption timeline rebuilt");
        Ok(timeline)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::keys;
    use crate::persistence::{ManualClock, MemoryStore, NewRecording};

    async fn scenario() -> (TimelineReconstructor, Recording, Arc<MemoryStore>) {
        let clock = ManualClock::new(950);
        let store = Arc::new(MemoryStore::with_clock(Arc::new(clock.clone())));
        let _ = store.insert_metadata(keys::TASK, "setup").await;
        clock.set(1_000);
        let Ok(recording) = store
            .start_recording(NewRecording {
                file_base_name: "stream".to_string(),
                file_extension: "mkv".to_string(),
                directory: "/videos".to_string(),
            })
            .await
        else {
            panic!("start failed");
        };
        let _ = store.insert_metadata(keys::TASK, "intro").await;
        clock.set(1_050);
        let _ = store.insert_caption("hello", 2.4).await;
        clock.set(1_080);
        let _ = store.insert_metadata(keys::TASK, "outro").await;
        clock.set(1_100);
        let _ = store.end_active_recordings().await;
        clock.set(1_200);
        let _ = store.insert_metadata(keys::TASK, "next stream").await;

        let Ok(Some(recording)) = store.get_recording(recording.id).await else {
            panic!("recording missing");
        };
        let dyn_store: Arc<dyn TimelineStore> = Arc::clone(&store) as Arc<dyn TimelineStore>;
        (TimelineReconstructor::new(dyn_store), recording, store)
    }

    #[tokio::test]
    async fn metadata_scenario() {
        let (reconstructor, recording, _) = scenario().await;
        let Ok(timeline) = reconstructor
            .reconstruct_metadata(&recording, keys::TASK)
            .await
        else {
            panic!("reconstruction failed");
        };
        let offsets: Vec<(&str, i64)> = timeline
            .iter()
            .map(|e| (e.text.as_str(), e.start_offset_seconds))
            .collect();
        assert_eq!(offsets, vec![("setup", -50), ("intro", 0), ("outro", 80)]);
    }

    #[tokio::test]
    async fn caption_scenario() {
        let (reconstructor, recording, _) = scenario().await;
        let Ok(captions) = reconstructor.reconstruct_captions(&recording).await else {
            panic!("reconstruction failed");
        };
        assert_eq!(captions.len(), 1);
        let Some(caption) = captions.first() else {
            panic!("caption missing");
        };
        assert_eq!(caption.start_offset_seconds, 47);
        assert_eq!(caption.end_offset_seconds, 50);
    }

    #[tokio::test]
    async fn unknown_key_is_empty() {
        let (reconstructor, recording, _) = scenario().await;
        let result = reconstructor.reconstruct_metadata(&recording, "mood").await;
        assert!(result.is_ok_and(|t| t.is_empty()));
    }

    #[tokio::test]
    async fn open_recording_is_rejected() {
        let (reconstructor, _, store) = scenario().await;
        let Ok(open) = store
            .start_recording(NewRecording {
                file_base_name: "live".to_string(),
                file_extension: "mkv".to_string(),
                directory: "/videos".to_string(),
            })
            .await
        else {
            panic!("start failed");
        };
        let metadata = reconstructor.reconstruct_metadata(&open, keys::TASK).await;
        let captions = reconstructor.reconstruct_captions(&open).await;
        assert!(matches!(metadata, Err(HubError::RecordingNotClosed(id)) if id == open.id));
        assert!(matches!(captions, Err(HubError::RecordingNotClosed(_))));
    }

    #[tokio::test]
    async fn reconstruction_is_repeatable() {
        let (reconstructor, recording, _) = scenario().await;
        let first = reconstructor.reconstruct_metadata(&recording, keys::TASK).await;
        let second = reconstructor.reconstruct_metadata(&recording, keys::TASK).await;
        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("reconstruction failed");
        };
        assert_eq!(first, second);
    }
}
