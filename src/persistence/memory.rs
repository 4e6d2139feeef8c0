//! In-process implementation of the timeline store.
//!
//! [`MemoryStore`] keeps every table in a `Vec` behind a single
//! [`tokio::sync::RwLock`], so each trait method is atomic with respect to
//! the others. Used when `PERSISTENCE_ENABLED=false` and throughout the
//! test suite, where a [`ManualClock`](super::ManualClock) pins insert
//! times.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::clock::{Clock, SystemClock};
use super::{NewRecording, TimelineStore};
use crate::domain::{CaptionEvent, MetadataEvent, Recording, RecordingId};
use crate::error::HubError;

#[derive(Debug, Default)]
struct Tables {
    metadata: Vec<MetadataEvent>,
    captions: Vec<CaptionEvent>,
    recordings: Vec<Recording>,
    next_id: i64,
    last_metadata_stamp: i64,
    last_caption_stamp: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id = self.next_id.saturating_add(1);
        self.next_id
    }
}

/// Memory-backed [`TimelineStore`].
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates an empty store stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn insert_metadata(&self, key: &str, value: &str) -> Result<MetadataEvent, HubError> {
        let mut tables = self.tables.write().await;
        let inserted_at = self.clock.now().max(tables.last_metadata_stamp);
        tables.last_metadata_stamp = inserted_at;
        let event = MetadataEvent {
            id: tables.next_id(),
            key: key.to_string(),
            value: value.to_string(),
            inserted_at,
        };
        tables.metadata.push(event.clone());
        Ok(event)
    }

    async fn latest_metadata(&self, key: &str) -> Result<Option<MetadataEvent>, HubError> {
        let tables = self.tables.read().await;
        Ok(tables
            .metadata
            .iter()
            .filter(|e| e.key == key)
            .max_by_key(|e| (e.inserted_at, e.id))
            .cloned())
    }

    async fn metadata_in_range(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<MetadataEvent>, HubError> {
        let tables = self.tables.read().await;
        let mut events: Vec<MetadataEvent> = tables
            .metadata
            .iter()
            .filter(|e| e.key == key && start <= e.inserted_at && e.inserted_at <= end)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.inserted_at, e.id));
        Ok(events)
    }

    async fn latest_metadata_before(
        &self,
        key: &str,
        before: i64,
    ) -> Result<Option<MetadataEvent>, HubError> {
        let tables = self.tables.read().await;
        Ok(tables
            .metadata
            .iter()
            .filter(|e| e.key == key && e.inserted_at < before)
            .max_by_key(|e| (e.inserted_at, e.id))
            .cloned())
    }

    async fn insert_caption(
        &self,
        text: &str,
        duration_seconds: f64,
    ) -> Result<CaptionEvent, HubError> {
        let mut tables = self.tables.write().await;
        let inserted_at = self.clock.now().max(tables.last_caption_stamp);
        tables.last_caption_stamp = inserted_at;
        let caption = CaptionEvent {
            id: tables.next_id(),
            text: text.to_string(),
            duration_seconds,
            inserted_at,
        };
        tables.captions.push(caption.clone());
        Ok(caption)
    }

    async fn captions_in_range(
        &self,
        start: i64,
        end: i64,
    ) -> Result<Vec<CaptionEvent>, HubError> {
        let tables = self.tables.read().await;
        let mut captions: Vec<CaptionEvent> = tables
            .captions
            .iter()
            .filter(|c| start <= c.inserted_at && c.inserted_at <= end)
            .cloned()
            .collect();
        captions.sort_by_key(|c| (c.inserted_at, c.id));
        Ok(captions)
    }

    async fn start_recording(&self, new: NewRecording) -> Result<Recording, HubError> {
        let mut tables = self.tables.write().await;
        let now = self.clock.now();
        for recording in tables.recordings.iter_mut().filter(|r| r.is_open()) {
            recording.end_time = Some(now.max(recording.start_time));
        }
        let recording = Recording {
            id: RecordingId::new(tables.next_id()),
            file_base_name: new.file_base_name,
            file_extension: new.file_extension,
            directory: new.directory,
            start_time: now,
            end_time: None,
            uploaded: false,
            inserted_at: now,
        };
        tables.recordings.push(recording.clone());
        Ok(recording)
    }

    async fn end_active_recordings(&self) -> Result<u64, HubError> {
        let mut tables = self.tables.write().await;
        let now = self.clock.now();
        let mut closed = 0_u64;
        for recording in tables.recordings.iter_mut().filter(|r| r.is_open()) {
            recording.end_time = Some(now.max(recording.start_time));
            closed = closed.saturating_add(1);
        }
        Ok(closed)
    }

    async fn get_recording(&self, id: RecordingId) -> Result<Option<Recording>, HubError> {
        let tables = self.tables.read().await;
        Ok(tables.recordings.iter().find(|r| r.id == id).cloned())
    }

    async fn pending_recordings(&self) -> Result<Vec<Recording>, HubError> {
        let tables = self.tables.read().await;
        let mut pending: Vec<Recording> = tables
            .recordings
            .iter()
            .filter(|r| !r.uploaded && !r.is_open())
            .cloned()
            .collect();
        pending.sort_by_key(|r| (r.start_time, r.id));
        Ok(pending)
    }

    async fn mark_uploaded(&self, id: RecordingId) -> Result<bool, HubError> {
        let mut tables = self.tables.write().await;
        match tables
            .recordings
            .iter_mut()
            .find(|r| r.id == id && !r.uploaded && !r.is_open())
        {
            Some(recording) => {
                recording.uploaded = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_uploaded(&self, id: RecordingId) -> Result<(), HubError> {
        let mut tables = self.tables.write().await;
        if let Some(recording) = tables.recordings.iter_mut().find(|r| r.id == id) {
            recording.uploaded = false;
        }
        Ok(())
    }
}
