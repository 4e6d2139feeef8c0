//! Publication: package a closed recording and hand it to the video
//! platform.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::TimelineReconstructor;
use crate::config::PublishConfig;
use crate::domain::event::keys;
use crate::domain::render::{
    DescriptionInput, chapters_from_timeline, render_description, render_subtitle_document,
    render_title, unique_tags,
};
use crate::domain::{EventBus, HubEvent, Recording, RecordingId, RelativeMetadataEvent};
use crate::error::HubError;
use crate::persistence::TimelineStore;
use crate::upload::{UploadRequest, VideoUploader};

/// The rendered artifacts for one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PublicationPackage {
    /// Source recording.
    pub recording_id: RecordingId,
    /// Every title used during the broadcast, joined.
    pub title: String,
    /// Chaptered description.
    pub description: String,
    /// Subtitle document.
    pub subtitles: String,
    /// Distinct tags.
    pub tags: Vec<String>,
    /// Stream-platform descriptions in effect during the recording, the
    /// carried-forward one included.
    pub stream_descriptions: Vec<RelativeMetadataEvent>,
    /// Recording start, ISO 8601.
    pub recording_time: String,
    /// Platform category id.
    pub category_id: String,
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PublishOutcome {
    /// Published recording.
    pub recording_id: RecordingId,
    /// Platform video id.
    pub video_id: String,
    /// Where the subtitle document was written.
    #[schema(value_type = String)]
    pub subtitle_path: PathBuf,
}

/// Orchestrates reconstruction, rendering and upload.
///
/// A publish claims the recording in the store before uploading, so
/// concurrent publishes of one recording upload it once. Any failure
/// after the claim returns the recording to pending so the whole publish
/// can be retried.
#[derive(Debug, Clone)]
pub struct PublishService {
    store: Arc<dyn TimelineStore>,
    reconstructor: TimelineReconstructor,
    uploader: Arc<dyn VideoUploader>,
    config: PublishConfig,
    event_bus: EventBus,
}

impl PublishService {
    /// Creates a new `PublishService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn TimelineStore>,
        uploader: Arc<dyn VideoUploader>,
        config: PublishConfig,
        event_bus: EventBus,
    ) -> Self {
        Self {
            reconstructor: TimelineReconstructor::new(Arc::clone(&store)),
            store,
            uploader,
            config,
            event_bus,
        }
    }

    /// Returns the timeline reconstructor.
    #[must_use]
    pub fn reconstructor(&self) -> &TimelineReconstructor {
        &self.reconstructor
    }

    /// Loads a recording.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::RecordingNotFound`] if no such recording exists
    /// and [`HubError::StoreUnavailable`] on store failure.
    pub async fn recording(&self, id: RecordingId) -> Result<Recording, HubError> {
        self.store
            .get_recording(id)
            .await?
            .ok_or(HubError::RecordingNotFound(id))
    }

    /// Closed recordings still waiting to be published.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::StoreUnavailable`] on store failure.
    pub async fn pending(&self) -> Result<Vec<Recording>, HubError> {
        self.store.pending_recordings().await
    }

    /// Raw reconstructed timeline of one key, negative offsets preserved.
    ///
    /// # Errors
    ///
    /// See [`TimelineReconstructor::reconstruct_metadata`]; also
    /// [`HubError::RecordingNotFound`].
    pub async fn timeline(
        &self,
        id: RecordingId,
        key: &str,
    ) -> Result<Vec<RelativeMetadataEvent>, HubError> {
        let recording = self.recording(id).await?;
        self.reconstructor.reconstruct_metadata(&recording, key).await
    }

    /// Renders the publication package for a recording without side
    /// effects.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::RecordingNotFound`], or any reconstruction
    /// error. The first failing fetch aborts the whole package.
    pub async fn prepare(&self, id: RecordingId) -> Result<PublicationPackage, HubError> {
        let recording = self.recording(id).await?;
        self.package(&recording).await
    }

    async fn package(&self, recording: &Recording) -> Result<PublicationPackage, HubError> {
        let r = &self.reconstructor;
        let (categories, titles, tags, descriptions, tasks, captions) = tokio::try_join!(
            r.reconstruct_metadata(recording, keys::CATEGORY),
            r.reconstruct_metadata(recording, keys::TITLE),
            r.reconstruct_metadata(recording, keys::TAGS),
            r.reconstruct_metadata(recording, keys::DESCRIPTION),
            r.reconstruct_metadata(recording, keys::TASK),
            r.reconstruct_captions(recording),
        )?;

        let recording_time = recording.start_time_iso8601()?;
        let tags = unique_tags(&tags);
        let chapters = chapters_from_timeline(&tasks);
        let description = render_description(&DescriptionInput {
            categories: &categories,
            chapters: &chapters,
            leading_label: &self.config.chapter_leading_label,
            social_links: &self.config.social_links,
            tags: &tags,
            streamed_at: &recording_time,
        });

        Ok(PublicationPackage {
            recording_id: recording.id,
            title: render_title(&titles, &self.config.title_delimiter),
            description,
            subtitles: render_subtitle_document(&captions),
            tags,
            stream_descriptions: descriptions,
            recording_time,
            category_id: self.config.category_id.clone(),
        })
    }

    /// Publishes a recording: renders the package, claims the recording,
    /// writes the subtitle document next to the video and uploads.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidRequest`] for a recording that is already
    /// uploaded or being published, any [`prepare`](Self::prepare) error,
    /// [`HubError::Io`] if the subtitle file cannot be written, and
    /// [`HubError::UploadFailed`] from the uploader. The recording is
    /// pending again after every error raised past the claim.
    pub async fn publish(&self, id: RecordingId) -> Result<PublishOutcome, HubError> {
        let recording = self.recording(id).await?;
        if recording.uploaded {
            return Err(already_uploaded(id));
        }

        let package = self.package(&recording).await?;

        if !self.store.mark_uploaded(id).await? {
            return Err(already_uploaded(id));
        }

        // Runs to completion even if the request future is dropped.
        let service = self.clone();
        tokio::spawn(async move { service.deliver(recording, package).await })
            .await
            .map_err(|e| HubError::Internal(format!("publish task failed: {e}")))?
    }

    async fn deliver(
        &self,
        recording: Recording,
        package: PublicationPackage,
    ) -> Result<PublishOutcome, HubError> {
        let id = recording.id;
        match self.upload(&recording, package).await {
            Ok(outcome) => {
                tracing::info!(recording_id = %id, video_id = %outcome.video_id, "recording published");
                let _ = self.event_bus.publish(HubEvent::RecordingPublished {
                    recording_id: id,
                    video_id: outcome.video_id.clone(),
                    timestamp: Utc::now(),
                });
                Ok(outcome)
            }
            Err(err) => {
                if let Err(release) = self.store.clear_uploaded(id).await {
                    tracing::error!(recording_id = %id, error = %release, "cannot return recording to pending");
                }
                tracing::warn!(recording_id = %id, error = %err, "publish failed");
                Err(err)
            }
        }
    }

    async fn upload(
        &self,
        recording: &Recording,
        package: PublicationPackage,
    ) -> Result<PublishOutcome, HubError> {
        let subtitle_path = recording.subtitle_path();
        tokio::fs::write(&subtitle_path, package.subtitles.as_bytes()).await?;

        let request = UploadRequest {
            video_path: recording.video_path(),
            subtitle_path: subtitle_path.clone(),
            title: package.title,
            description: package.description,
            tags: package.tags,
            recording_time: package.recording_time,
            category_id: package.category_id,
        };
        let video_id = self.uploader.upload(&request).await?;

        Ok(PublishOutcome {
            recording_id: recording.id,
            video_id,
            subtitle_path,
        })
    }
}

fn already_uploaded(id: RecordingId) -> HubError {
    HubError::InvalidRequest(format!("recording {id} is already uploaded or being published"))
}
