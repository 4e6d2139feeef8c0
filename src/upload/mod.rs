//! Video-hosting collaborator boundary.
//!
//! The publication service hands a finished package to a [`VideoUploader`]
//! and only marks the recording uploaded when the uploader returns a video
//! id. [`OutboxUploader`] stages packages on disk; a platform client
//! plugs in behind the same trait.

pub mod outbox;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::HubError;

pub use outbox::OutboxUploader;

/// Everything the video platform needs to publish one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    /// Recorded video file.
    pub video_path: PathBuf,
    /// Rendered subtitle document on disk.
    pub subtitle_path: PathBuf,
    /// Composite title.
    pub title: String,
    /// Rendered description.
    pub description: String,
    /// Distinct tags.
    pub tags: Vec<String>,
    /// Recording start, ISO 8601.
    pub recording_time: String,
    /// Platform category id.
    pub category_id: String,
}

/// Publishes a video and its captions.
#[async_trait]
pub trait VideoUploader: Send + Sync + std::fmt::Debug {
    /// Uploads the package and returns the platform's video id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UploadFailed`] if the platform rejects the
    /// package or cannot be reached.
    async fn upload(&self, request: &UploadRequest) -> Result<String, HubError>;
}
