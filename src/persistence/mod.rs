//! Persistence layer: the append-only event store and recording registry.
//!
//! [`TimelineStore`] is the contract the services depend on. Two
//! implementations ship with the crate: [`postgres::PostgresStore`] for
//! durable storage and [`memory::MemoryStore`] for running without a
//! database and for tests. Every method is an atomic, self-contained call;
//! callers never hold a transaction across methods.

pub mod clock;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{CaptionEvent, MetadataEvent, Recording, RecordingId};
use crate::error::HubError;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// File location of a recording about to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecording {
    /// File name without extension.
    pub file_base_name: String,
    /// File extension without the dot.
    pub file_extension: String,
    /// Directory holding the file.
    pub directory: String,
}

/// Storage contract for timeline events and recordings.
///
/// Insert times are stamped by the store and never decrease across
/// inserts of the same event kind. Range queries are inclusive at both
/// ends and ordered ascending by `(inserted_at, id)`.
#[async_trait]
pub trait TimelineStore: Send + Sync + std::fmt::Debug {
    /// Appends a metadata event stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn insert_metadata(&self, key: &str, value: &str) -> Result<MetadataEvent, HubError>;

    /// Returns the most recent value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn latest_metadata(&self, key: &str) -> Result<Option<MetadataEvent>, HubError>;

    /// Returns every `key` event with `start <= inserted_at <= end`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn metadata_in_range(
        &self,
        key: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<MetadataEvent>, HubError>;

    /// Returns the latest `key` event with `inserted_at < before`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn latest_metadata_before(
        &self,
        key: &str,
        before: i64,
    ) -> Result<Option<MetadataEvent>, HubError>;

    /// Appends a caption stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn insert_caption(
        &self,
        text: &str,
        duration_seconds: f64,
    ) -> Result<CaptionEvent, HubError>;

    /// Returns every caption with `start <= inserted_at <= end`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn captions_in_range(&self, start: i64, end: i64)
    -> Result<Vec<CaptionEvent>, HubError>;

    /// Closes every open recording, then opens a new one starting now.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn start_recording(&self, new: NewRecording) -> Result<Recording, HubError>;

    /// Sets the end time of every open recording to now. Returns how many
    /// recordings were closed.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn end_active_recordings(&self) -> Result<u64, HubError>;

    /// Looks up a recording by id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn get_recording(&self, id: RecordingId) -> Result<Option<Recording>, HubError>;

    /// Returns closed recordings not yet uploaded, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn pending_recordings(&self) -> Result<Vec<Recording>, HubError>;

    /// Atomically flips a closed, not yet uploaded recording to uploaded.
    ///
    /// Returns `false` if the recording is missing, still open, or already
    /// uploaded, so at most one concurrent caller ever gets `true`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn mark_uploaded(&self, id: RecordingId) -> Result<bool, HubError>;

    /// Returns a recording to pending after a claimed upload failed.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] if the store cannot be reached.
    async fn clear_uploaded(&self, id: RecordingId) -> Result<(), HubError>;
}
